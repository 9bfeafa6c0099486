//! Core types for lspwire.
//!
//! This crate provides the pieces every other lspwire crate builds on:
//! - [`ErrorCode`] and [`LspError`], the JSON-RPC / LSP error model
//! - the [`logging`] facade and its targets
//! - [`LoggingConfig`] and [`DispatchConfig`]
//!
//! It performs no I/O and installs no logger.

#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod logging;

pub use config::{DispatchConfig, LoggingConfig, UnknownNotificationPolicy};
pub use error::{
    ErrorCode, JSONRPC_RESERVED_RANGE_END, JSONRPC_RESERVED_RANGE_START, LSP_RESERVED_RANGE_END,
    LSP_RESERVED_RANGE_START, LspError, LspResult,
};
