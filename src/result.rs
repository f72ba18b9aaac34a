use crate::catalog;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("map expression compilation failed: {0}")]
    CompilationFailed(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] catalog::Error),
}
