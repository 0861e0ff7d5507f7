//!
//! Common Errors.
//!
use std::fmt;

pub type Result<T> = std::result::Result<T, ShibaError>;

#[derive(Debug)]
pub enum ShibaError {
    InvalidSQL(String),
    InvalidPageRequest(String),
    MissingIdent(String),
    MissingTable(String),
    MissingField(String),
    DataError(String),
    ExecuteError(String),
    R2D2Error(String),
    UnknownDatabase(String),
    UnsupportedOperation(String),
    EmptyData,
}

impl fmt::Display for ShibaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShibaError::InvalidSQL(ref err) => err.fmt(f),
            ShibaError::InvalidPageRequest(ref err) => write!(f, "Invalid page request: {}", err),
            ShibaError::MissingIdent(ref err) => err.fmt(f),
            ShibaError::MissingTable(ref err) => err.fmt(f),
            ShibaError::MissingField(ref err) => err.fmt(f),
            ShibaError::DataError(ref err) => err.fmt(f),
            ShibaError::ExecuteError(ref err) => err.fmt(f),
            ShibaError::R2D2Error(ref err) => err.fmt(f),
            ShibaError::UnknownDatabase(ref err) => write!(f, "Unknown database: {}", err),
            ShibaError::UnsupportedOperation(ref err) => err.fmt(f),
            ShibaError::EmptyData => write!(f, "Empty data"),
        }
    }
}

impl std::error::Error for ShibaError {}

impl From<rusqlite::Error> for ShibaError {
    fn from(err: rusqlite::Error) -> Self {
        ShibaError::ExecuteError(err.to_string())
    }
}

impl From<r2d2::Error> for ShibaError {
    fn from(err: r2d2::Error) -> Self {
        ShibaError::R2D2Error(err.to_string())
    }
}
