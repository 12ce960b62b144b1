//! Unified error types for GESTIMA.
//!
//! Calculation-layer problems (missing reference data, invalid stock geometry)
//! are recovered locally by the costing pipeline: the affected component is
//! priced at zero and a warning is logged, so a partially configured part can
//! still be saved. Only conflict, validation, and database errors propagate to
//! the caller.

use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Invalid quantity: {quantity} (must be positive)")]
    InvalidQuantity { quantity: i32 },

    #[error("Invalid stock geometry for {shape}: missing or non-positive {field}")]
    InvalidGeometry {
        shape: &'static str,
        field: &'static str,
    },

    #[error("Part not found: id={id}")]
    PartNotFound { id: i64 },

    #[error("Batch not found: id={id}")]
    BatchNotFound { id: i64 },

    #[error("Quote not found: id={id}")]
    QuoteNotFound { id: i64 },

    #[error("Machine not found: id={id}")]
    MachineNotFound { id: i64 },

    #[error("Material input not found: id={id}")]
    MaterialInputNotFound { id: i64 },

    #[error("Operation not found: id={id}")]
    OperationNotFound { id: i64 },

    #[error("Batch {id} is frozen; costs are immutable (clone it to re-price)")]
    BatchFrozen { id: i64 },

    #[error("Quote {id} has already been sent")]
    QuoteAlreadySent { id: i64 },

    #[error("Quote total {stored:.2} does not match sum of items {computed:.2}")]
    QuoteTotalMismatch { stored: f64, computed: f64 },

    #[error("Version conflict on {entity} id={id}: expected version {expected}, found {actual}")]
    VersionConflict {
        entity: &'static str,
        id: i64,
        expected: i32,
        actual: i32,
    },
}

impl Error {
    /// True for optimistic-lock conflicts. The HTTP layer maps these to
    /// 409 Conflict; the client must reload the entity and retry.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
