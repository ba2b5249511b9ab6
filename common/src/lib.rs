//! # Subscope Common
//!
//! Types shared between the enumeration engine and its front ends:
//!
//! * **[`domain`]**: validated target domains and target list parsing.
//! * **[`result`]**: the per-task [`result::EnumerationResult`].
//! * **[`config`]**: user settings loaded from file and flags.
//! * **[`error`]**: configuration errors raised before a run starts.

pub mod config;
pub mod domain;
pub mod error;
pub mod result;

pub use domain::Domain;
pub use error::ConfigError;
pub use result::EnumerationResult;
