//! # QuantDesk Session
//!
//! Client-side session state: who is logged in, and the lifecycle
//! transitions between anonymous and authenticated. The manager is built
//! against the [`api_client::AuthApi`] trait so it can be driven by the live
//! client or a mock, and it observes the transport layer's expiry broadcasts
//! rather than being called back directly.

// Declare the modules that make up this crate.
pub mod error;
pub mod manager;

// Re-export the core types to provide a clean public API.
pub use error::SessionError;
pub use manager::{SessionManager, SessionSnapshot, SessionState};
