//! Notes Control library - client side of the notes formatter.

pub mod actions;
pub mod client;
pub mod errors;
pub mod progress;
pub mod submit;
