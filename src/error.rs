//! Error types for the appconf library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for appconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for appconf operations
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize configuration map: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse settings file '{path}': {reason}")]
    SectionFile { path: PathBuf, reason: String },

    #[cfg(feature = "xml")]
    #[error("XML document error in '{path}': {reason}")]
    Xml { path: PathBuf, reason: String },

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // -------------------------------------------------------------------------
    // Field Conversion Errors
    // -------------------------------------------------------------------------
    #[error("Cannot parse '{text}' as {kind}")]
    Conversion { kind: &'static str, text: String },

    #[error("Type mismatch for field '{field}': expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown field: {0}")]
    FieldNotFound(String),

    // -------------------------------------------------------------------------
    // Encryption Errors
    // -------------------------------------------------------------------------
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Field '{0}' is marked for encryption but is not declared on the settings type")]
    UnknownEncryptedField(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Internal lock was poisoned - possible thread panic")]
    LockPoisoned,
}
