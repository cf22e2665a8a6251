//! Единый тип ошибок публичного API.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcoError {
    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientFunds { requested: Decimal, available: Decimal },

    #[error("No collection bin: purchase a bin first")]
    NoBin,

    /// Отказ с готовым текстом для экрана.
    #[error("{0}")]
    Declined(&'static str),

    #[error("Missing details: {0}")]
    MissingDetails(&'static str),

    #[error("Invalid step: {0}")]
    InvalidStep(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, EcoError>;
