//! tubeterm library crate.
//!
//! Plays a video stream in the terminal by downsampling each decoded
//! frame to the character grid and drawing 24-bit colored blocks.
//! Exposed as a library for the binary and for integration tests.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod raster;
pub mod stream;
pub mod telemetry;
pub mod terminal;

pub use error::{Error, Result};
