use thiserror::Error;
use uuid::Uuid;

/// Domain errors raised by validation and the repository.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("interaction frequency must be a positive number of days, got {0}")]
    InvalidFrequency(i64),

    #[error("unknown tier: {0}")]
    InvalidTier(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("no contact with id {0}")]
    UnknownContact(Uuid),

    #[error("no task with id {0}")]
    UnknownTask(Uuid),

    #[error("id {0} already exists")]
    DuplicateId(Uuid),
}

pub type Result<T> = std::result::Result<T, Error>;
