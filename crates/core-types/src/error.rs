use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unrecognised date: '{0}'")]
    InvalidDate(String),
}
