//! Error codes and exit status for notesctl

use thiserror::Error;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the input was rejected before sending
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Exit code when the server answered with an error
pub const EXIT_SERVER_ERROR: i32 = 65;

/// Exit code when the server could not be reached or timed out
pub const EXIT_UNAVAILABLE: i32 = 70;

/// Exit code when another request is still in flight
pub const EXIT_BUSY: i32 = 75;

/// Why a submission did not produce a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please enter some notes to format")]
    EmptyInput,

    #[error("A formatting request is already in progress")]
    Busy,

    #[error(
        "Request timed out after {0}s. The workflow may still be running upstream - try again shortly."
    )]
    Timeout(u64),

    #[error("Error: {0}")]
    Transport(String),

    #[error("Error: {0}")]
    Server(String),
}

impl SubmitError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitError::EmptyInput => EXIT_INVALID_INPUT,
            SubmitError::Busy => EXIT_BUSY,
            SubmitError::Timeout(_) | SubmitError::Transport(_) => EXIT_UNAVAILABLE,
            SubmitError::Server(_) => EXIT_SERVER_ERROR,
        }
    }
}
