//! Thin I/O shell around the engine.

pub mod config;
