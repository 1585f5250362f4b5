//! Error type shared by command handlers.

use crate::side_channel::ChannelError;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathyError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("invalid key pattern '{pattern}': {source}")]
    InvalidKey {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{var} holds bytes that are not valid UTF-8; refusing to rewrite it")]
    NotUnicode { var: String },

    #[error("editor not given and EDITOR environment variable is not set")]
    EditorNotSet,

    #[error("cannot create temporary file: {0}")]
    TempFile(#[source] io::Error),

    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    ProgramFailed { program: String, status: ExitStatus },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PathyError>;
