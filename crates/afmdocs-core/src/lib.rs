//! afmdocs Core
//!
//! This crate provides core types, HTML escaping, and error definitions
//! for the afmdocs Markdown engine.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`Block`], [`InlineSpan`] - The document model and its HTML rendering
//! - [`escape_html`] - Escaping for literal user content
//! - [`Diagnostics`] - Injected sink for warnings
//! - [`AfmdocsError`] - Error types

pub mod block;
pub mod diagnostics;
pub mod error;
pub mod escape;

pub use block::{Block, InlineSpan};
pub use diagnostics::{
    default_diagnostics, CollectingDiagnostics, Diagnostics, Level, LogDiagnostics,
};
pub use error::{AfmdocsError, IoOp, Result};
pub use escape::{escape_html, needs_escape};
