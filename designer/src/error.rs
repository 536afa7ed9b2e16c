//! Shared error-code contract for errors that reach the user or cross a
//! service boundary.

use canvas::codec::CodecError;
use canvas::doc::StoreError;

/// Grepable error code and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        StoreError::error_code(self)
    }
}

impl ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        CodecError::error_code(self)
    }
}
