//! The module contains the errors the engine can throw.
//!
//! The server maps these onto HTTP status codes without inspecting the
//! messages, so the variant is the contract and the message is for humans.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Missing or malformed required input. Caller-fixable.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The referenced record does not exist.
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    /// The record exists but is owned by another user.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    /// Underlying store failure. Transient, safe for the caller to retry.
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
