//! Chiso Core - Talking-Head Avatar Synthesis Orchestration
//!
//! This crate wraps a third-party talking-head synthesis engine behind a
//! small orchestration layer: it persists uploaded audio/image pairs,
//! offloads the engine's blocking synthesis routine to the worker pool, and
//! tracks the produced video artifacts through a generated → pushed
//! lifecycle until deletion.
//!
//! # Architecture
//!
//! - [`engine`] locates the external engine installation, validates its
//!   model assets, and invokes its synchronous synthesis routine.
//! - [`runtime`] bridges that blocking call into the async request
//!   lifecycle via `spawn_blocking`.
//! - [`store`] owns the in-memory avatar collections and their two-state
//!   machine.
//! - [`upload`] validates and persists incoming payloads with
//!   partial-failure cleanup.

pub mod config;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod store;
pub mod upload;

pub use config::EngineConfig;
pub use engine::{EngineHandle, EngineLocator, ProcessBackend, SynthesisBackend};
pub use error::{Error, Result};
pub use runtime::SynthesisRuntime;
pub use store::{ArtifactStore, AvatarRecord, AvatarState};
pub use upload::Upload;
