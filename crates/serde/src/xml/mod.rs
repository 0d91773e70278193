//! XML output for projected records.
//!
//! - [`XmlStreamWriter`] writes records straight to quick-xml events,
//!   tracking open elements so the result is well-formed by construction.
//! - [`check_well_formed`] validates markup that did not come from the
//!   writer, in a single streaming read.
//!
//! ```
//! use cadence_serde::Record;
//! use cadence_serde::xml::{XmlStreamWriter, check_well_formed};
//!
//! let song = Record::new("song").with_id(101).text("title", "Roygbiv").integer("track", 3);
//! let mut writer = XmlStreamWriter::new();
//! writer.write_record(&song)?;
//! let xml = writer.finish()?;
//! assert!(xml.contains("<track>3</track>"));
//! check_well_formed(&xml)?;
//! # Ok::<(), cadence_serde::SerdeError>(())
//! ```

mod check;
pub mod utils;
mod writer;

pub use check::check_well_formed;
pub use writer::XmlStreamWriter;
