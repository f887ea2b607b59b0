//! External synthesis engine integration.
//!
//! The engine is an externally provisioned installation on disk. [`locator`]
//! resolves and validates it, [`backend`] invokes its synchronous synthesis
//! routine, and [`adapter`] wraps both behind a single verified
//! `synthesize` call.

pub mod adapter;
pub mod backend;
pub mod locator;

pub use adapter::synthesize;
pub use backend::{ProcessBackend, SynthesisBackend};
pub use locator::{EngineHandle, EngineLocator};
