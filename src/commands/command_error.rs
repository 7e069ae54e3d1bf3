use thiserror::Error;

/// Application level errors.
///
/// These are reported back to the client as an `ERR` reply on the same
/// connection, which stays open afterwards.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("invalid command")]
    InvalidCommand,
    #[error("{0} does not exist")]
    KeyNotFound(String),
    #[error("{0} already exists")]
    KeyAlreadyExists(String),
    #[error("reply too large")]
    ReplyTooLarge,
}

impl CommandError {
    pub fn as_string(&self) -> String {
        match self {
            CommandError::InvalidCommand => "ERR invalid command".to_string(),
            CommandError::KeyNotFound(key) => format!("ERR {} does not exist", key),
            CommandError::KeyAlreadyExists(key) => format!("ERR {} already exists", key),
            CommandError::ReplyTooLarge => "ERR reply too large".to_string(),
        }
    }
}
