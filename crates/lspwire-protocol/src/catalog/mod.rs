//! Typed protocol payloads.
//!
//! Only the shapes needed by the methods typed in [`crate::methods`] are
//! modelled here. Everything else travels as [`LspAny`].

mod base;
mod document;
mod enums;
mod lifecycle;

pub use base::*;
pub use document::*;
pub use enums::*;
pub use lifecycle::*;

/// Any JSON value.
pub type LspAny = serde_json::Value;

/// A JSON object with arbitrary keys.
pub type LspObject = serde_json::Map<String, serde_json::Value>;

/// A URI naming a text document.
pub type DocumentUri = String;

/// A URI that is not necessarily a document.
pub type Uri = String;
