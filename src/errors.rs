//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Journey stage name outside the five defined stages.
    InvalidState(String),
    /// Lead record violates a data-model invariant.
    MalformedLead(String),
    /// Requested lead does not exist in the store.
    NotFound(String),
    /// Reply simulation could not be scheduled or delivered.
    Simulation(String),
    /// JSON encoding or decoding failure.
    Serialization(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::MalformedLead(msg) => write!(f, "malformed lead: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Simulation(msg) => write!(f, "simulation: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
