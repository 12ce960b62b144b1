//! Core business logic - framework-agnostic costing and quoting operations.
//!
//! The costing pipeline is deterministic arithmetic over already-loaded rows:
//! stock geometry → weight, tiered per-kg pricing, machining/setup time ×
//! machine rates, aggregated into per-unit and per-batch prices. Pure
//! calculation functions live next to the async orchestration functions that
//! load rows and persist results; all multi-row writes go through a single
//! database transaction.

pub mod batch;
pub mod geometry;
pub mod machining;
pub mod material;
pub mod part;
pub mod pricing;
pub mod quote;
pub mod recalc;
pub mod snapshot;
pub mod tiers;
