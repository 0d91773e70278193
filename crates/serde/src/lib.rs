//! # Cadence serialization primitives
//!
//! Format-neutral building blocks for the Cadence API documents.
//!
//! - [`Record`] / [`Value`]: an ordered, typed projection of one catalog
//!   object. Numeric values are written bare; text values are CDATA in XML
//!   and strings in JSON.
//! - [`keyed`]: free-form nested name/text trees, written by both the XML
//!   writer and `serde_json`.
//! - [`sanitize`]: removal of code points that are not legal XML characters.
//! - [`xml`]: a streaming writer that validates nesting as it writes, and a
//!   single-pass well-formedness check for externally supplied markup.
//! - [`json`]: thin wrappers around `serde_json`.

pub mod error;
pub mod json;
pub mod keyed;
pub mod record;
pub mod sanitize;
pub mod xml;

pub use error::{Result, SerdeError};
pub use keyed::{KeyedEntry, KeyedObject, KeyedValue};
pub use record::{Field, Link, Record, Scalar, Value};
pub use sanitize::{clean_body, clean_text};

pub use json::{parse_object, to_json_string_pretty};
