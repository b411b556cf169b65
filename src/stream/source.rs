//! Frame pull loop.

use super::ffmpeg::FfmpegReader;
use super::frame::Frame;
use super::reader::FrameReader;
use super::resolve::resolve_media_url;
use super::settings::StreamSettings;
use crate::error::Result;

/// Per-frame callback. Return `Ok(false)` to stop the loop.
pub type FrameCallback<'a> = Box<dyn FnMut(&Frame) -> Result<bool> + 'a>;

/// Why [`FrameSource::start`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The reader had no more frames
    EndOfStream,
    /// The callback (or the preview fallback) asked to stop
    Stopped,
    /// Nothing was opened
    NotOpened,
}

/// Pulls frames from a [`FrameReader`] and hands them to a callback.
pub struct FrameSource<'a> {
    settings: StreamSettings,
    reader: Option<Box<dyn FrameReader>>,
    receiver: Option<FrameCallback<'a>>,
    frames: u64,
}

impl<'a> FrameSource<'a> {
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            settings,
            reader: None,
            receiver: None,
            frames: 0,
        }
    }

    /// Source backed by an already-open reader.
    pub fn with_reader(reader: Box<dyn FrameReader>) -> Self {
        Self {
            reader: Some(reader),
            ..Self::new(StreamSettings::default())
        }
    }

    /// Open `url`, replacing any previous reader.
    ///
    /// An empty URL is ignored so a source can be built and bound before
    /// the URL is known.
    pub fn open(&mut self, url: &str) -> Result<()> {
        if url.is_empty() {
            return Ok(());
        }

        let media = resolve_media_url(url, &self.settings)?;
        self.reader = Some(Box::new(FfmpegReader::spawn(&media, &self.settings)?));
        self.frames = 0;
        log::info!("Opened stream {}", url);
        Ok(())
    }

    /// Set the per-frame callback.
    pub fn bind(&mut self, receiver: FrameCallback<'a>) {
        self.receiver = Some(receiver);
    }

    /// Remove the callback, falling back to the reader's preview.
    pub fn unbind(&mut self) {
        self.receiver = None;
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Frames delivered since the last `open`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run the pull loop on the calling thread until the stream ends or
    /// the callback declines the next frame.
    pub fn start(&mut self) -> Result<StopReason> {
        let Some(reader) = self.reader.as_mut() else {
            log::warn!("FrameSource started with nothing opened");
            return Ok(StopReason::NotOpened);
        };

        loop {
            let Some(frame) = reader.read_frame()? else {
                log::info!("End of stream after {} frames", self.frames);
                return Ok(StopReason::EndOfStream);
            };
            self.frames += 1;

            let keep_going = match self.receiver.as_mut() {
                Some(receiver) => receiver(&frame)?,
                None => reader.preview(&frame)?,
            };

            if !keep_going {
                log::info!("Playback stopped after {} frames", self.frames);
                return Ok(StopReason::Stopped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::PixelFormat;

    struct Countdown(u32);

    impl FrameReader for Countdown {
        fn read_frame(&mut self) -> Result<Option<Frame>> {
            if self.0 == 0 {
                return Ok(None);
            }
            self.0 -= 1;
            Ok(Some(Frame::new(vec![0; 3], 1, 1, PixelFormat::Rgb24)))
        }
    }

    #[test]
    fn test_open_empty_url_is_noop() {
        let mut source = FrameSource::new(StreamSettings::default());
        source.open("").unwrap();
        assert!(!source.is_open());
        assert_eq!(source.start().unwrap(), StopReason::NotOpened);
    }

    #[test]
    fn test_runs_to_end_of_stream() {
        let mut seen = 0;
        {
            let mut source = FrameSource::with_reader(Box::new(Countdown(3)));
            source.bind(Box::new(|_frame: &Frame| {
                seen += 1;
                Ok(true)
            }));
            assert_eq!(source.start().unwrap(), StopReason::EndOfStream);
            assert_eq!(source.frames(), 3);
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_callback_false_stops() {
        let mut source = FrameSource::with_reader(Box::new(Countdown(10)));
        let mut seen = 0;
        source.bind(Box::new(move |_frame: &Frame| {
            seen += 1;
            Ok(seen < 2)
        }));
        assert_eq!(source.start().unwrap(), StopReason::Stopped);
        assert_eq!(source.frames(), 2);
    }
}
