//! Notes daemon library - exposes modules for testing.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod transcription;
pub mod workflow;
