//! Declarative XML decoding driven by per-field XPath selectors.
//!
//! Annotate a struct's fields with selector expressions, hand the crate a
//! document, and get typed values back: the engine narrows a working node
//! set per field via the XPath engine, coerces leaf text into scalars, and
//! recurses for nested records, sequences and fixed-length arrays. Failures
//! come back as a single error whose message reconstructs the destination
//! path from the root type down to the failing leaf.
//!
//! ```
//! use xtag::decodable;
//!
//! decodable! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Item {
//!         #[xpath = ".//item/name"]
//!         pub name: String,
//!         #[xpath = ".//item/@id"]
//!         pub id: u32,
//!         #[xpath = ".//item/note"]
//!         #[xpath_required = "false"]
//!         pub note: String,
//!     }
//! }
//!
//! let xml = r#"<catalog><item id="7"><name>alpha</name></item></catalog>"#;
//! let mut item = Item::default();
//! xtag::decode(xml.as_bytes(), &mut item)?;
//! assert_eq!(item.name, "alpha");
//! assert_eq!(item.id, 7);
//! assert_eq!(item.note, "");
//! # Ok::<(), xtag::Error>(())
//! ```
//!
//! Parsing and selector evaluation are consumed from `sxd-document` and
//! `sxd-xpath`. This crate owns the decode discipline (single- vs multi-node
//! resolution, required/optional defaulting, fixed-length enforcement) and
//! the frame-chain error model.

pub mod decode;
pub mod decoder;
pub mod directive;
pub mod error;
mod macros;
pub mod selection;
pub(crate) mod selector;

pub use decode::{decode, decode_selection, decode_str, Any, FromXml, Kind, NodeList};
pub use decoder::Decoder;
pub use directive::{Directive, IGNORE_MARKER};
pub use error::{BoxError, DecodeError, Error, Reason, Result, Segment, Unwound};
pub use selection::Selection;

/// Node handle custom decode hooks receive, re-exported from the selector
/// engine.
pub use sxd_xpath::nodeset::Node;
