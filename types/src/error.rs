use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown protocol version '{0}' (expected \"v2\" or \"v3\")")]
    UnknownVersion(String),
}
