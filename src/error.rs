#![allow(dead_code)]

use crate::stage::ConnectionStage;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Raw failure code reported by a collaborator (platform layer, resolver,
/// handshake or stream implementation). Nonzero values are
/// implementation-defined; zero is never an error.
pub type ErrorCode = i32;

/// Result of a single fallible setup or start action.
pub type StageResult = std::result::Result<(), ErrorCode>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid packet size specified")]
    ErrInvalidPacketSize,
    #[error("invalid appversion string: {0}")]
    ErrInvalidAppVersion(String),
    #[error("{stage} failed with code {code}")]
    ErrStageFailed {
        stage: ConnectionStage,
        code: ErrorCode,
    },
}
