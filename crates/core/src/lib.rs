//! Core types and shared functionality for mcp-fetch.
//!
//! This crate provides:
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError, Transport};
pub use error::Error;
