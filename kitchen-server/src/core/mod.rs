//! Core module - server configuration, state, and errors
//!
//! # Structure
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared handles to every service
//! - [`Server`] - startup and graceful shutdown
//! - [`ServerError`] - assembly/runtime error type
//! - [`tasks`] - background task registry

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
