//! # QuantDesk Events
//!
//! This crate defines the session lifecycle events emitted by the transport
//! layer and observed by the session manager and the CLI. Keeping them in a
//! small Layer 0 crate lets the API client announce "this session is gone"
//! without knowing anything about presentation.

// Declare the modules that make up this crate.
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use messages::{ExpiryReason, SessionEvent, SessionExpiry};
