//! ffmpeg decoder process.
//!
//! Spawns ffmpeg to decode the stream into raw fixed-size frames on its
//! stdout and reads them back one at a time.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::frame::Frame;
use super::reader::FrameReader;
use super::settings::StreamSettings;
use crate::error::{Error, Result};

/// Stderr lines kept for error reports.
const STDERR_TAIL: usize = 20;

/// How long a graceful shutdown may take before the decoder is killed.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the ffmpeg argument list for decoding `url`.
pub fn decoder_args(url: &str, settings: &StreamSettings) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
    if settings.realtime {
        args.push("-re".into());
    }
    args.extend([
        "-i".into(),
        url.to_string(),
        "-an".into(),
        "-vf".into(),
        format!("scale={}:{}", settings.width, settings.height),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        settings.pixel_format.ffmpeg_name().into(),
        "pipe:1".into(),
    ]);
    args
}

/// A running ffmpeg decoder.
pub struct FfmpegReader {
    child: Child,
    /// `None` once shutdown has closed the pipe
    stdout: Option<BufReader<ChildStdout>>,
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    url: String,
    settings: StreamSettings,
    frames_read: u64,
    finished: bool,
}

impl FfmpegReader {
    /// Start decoding `url`.
    ///
    /// # Errors
    /// [`Error::StreamUnavailable`] when ffmpeg is missing or cannot be
    /// spawned, or when the decode size has a zero axis.
    pub fn spawn(url: &str, settings: &StreamSettings) -> Result<Self> {
        // A zero-byte frame would make every read succeed without consuming input
        if settings.width == 0 || settings.height == 0 {
            return Err(Error::unavailable(
                url,
                format!(
                    "invalid decode size {}x{}",
                    settings.width, settings.height
                ),
            ));
        }

        let args = decoder_args(url, settings);
        log::info!("Spawning {} {}", settings.ffmpeg, args.join(" "));

        let mut child = Command::new(&settings.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Error::unavailable(
                        url,
                        format!("'{}' not found. Install ffmpeg and make sure it is on PATH.", settings.ffmpeg),
                    )
                } else {
                    Error::unavailable(url, format!("failed to spawn ffmpeg: {}", e))
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::unavailable(url, "ffmpeg stdout was not captured"))?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut tail = VecDeque::with_capacity(STDERR_TAIL);
                for line in BufReader::new(stderr).lines() {
                    match line {
                        Ok(l) => {
                            log::debug!("[ffmpeg] {}", l);
                            if tail.len() == STDERR_TAIL {
                                tail.pop_front();
                            }
                            tail.push_back(l);
                        }
                        Err(_) => break,
                    }
                }
                tail.into_iter().collect()
            })
        });

        let frame_len = Frame::byte_len(settings.width, settings.height);

        Ok(Self {
            child,
            stdout: Some(BufReader::with_capacity(frame_len.max(8192), stdout)),
            stderr_thread,
            url: url.to_string(),
            settings: settings.clone(),
            frames_read: 0,
            finished: false,
        })
    }

    /// Frames decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Ask ffmpeg to stop, killing it if it does not exit in time.
    ///
    /// The output pipe is closed first so a decoder blocked on a full pipe
    /// fails its write instead of waiting out the timeout. Later reads
    /// report end of stream.
    pub fn shutdown(&mut self) -> io::Result<ExitStatus> {
        self.stdout = None;
        self.finished = true;

        #[cfg(unix)]
        {
            // SAFETY: plain kill(2) on our own child's pid
            unsafe {
                libc::kill(self.child.id() as libc::pid_t, libc::SIGINT);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        let start = Instant::now();
        loop {
            match self.child.try_wait()? {
                Some(status) => return Ok(status),
                None if start.elapsed() > SHUTDOWN_TIMEOUT => {
                    let _ = self.child.kill();
                    return self.child.wait();
                }
                None => thread::sleep(Duration::from_millis(50)),
            }
        }
    }

    /// Join the stderr reader and return what ffmpeg printed last.
    fn take_stderr(&mut self) -> String {
        self.stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
            .join("\n")
    }

    /// Decoder hit EOF: decide between end of stream and a failed open.
    fn finish(&mut self) -> Result<Option<Frame>> {
        self.finished = true;
        let status = self.child.wait().map_err(Error::Decoder)?;
        let stderr = self.take_stderr();

        if self.frames_read == 0 && !status.success() {
            return Err(Error::unavailable(
                &self.url,
                format!("ffmpeg exited with code {:?}\n{}", status.code(), stderr),
            ));
        }

        log::info!(
            "Decoder finished after {} frames ({})",
            self.frames_read,
            status
        );
        Ok(None)
    }
}

impl FrameReader for FfmpegReader {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut data = vec![0u8; Frame::byte_len(self.settings.width, self.settings.height)];
        match stdout.read_exact(&mut data) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(Some(Frame::new(
                    data,
                    self.settings.width,
                    self.settings.height,
                    self.settings.pixel_format,
                )))
            }
            // A trailing partial frame is dropped
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => self.finish(),
            Err(e) => Err(Error::Decoder(e)),
        }
    }
}

impl Drop for FfmpegReader {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.shutdown();
        }
    }
}
