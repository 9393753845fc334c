//! Per-field decoding metadata.
//!
//! A field declares a selector expression and optionally overrides the
//! required policy. The selector is opaque here, handed to the selector
//! engine unchanged, but two shape hints are read off its tail to
//! steer single-match resolution: a positional `[n]` suffix pins the
//! selector to one node, and a `text()` suffix addresses text nodes whose
//! multiple matches concatenate.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Reserved selector marking a field as ignored by the decoder.
pub const IGNORE_MARKER: &str = "-";

static INDEX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]$").expect("index-suffix pattern compiles"));

/// Parsed decoding metadata for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Selector expression, or empty to reuse the enclosing Selection.
    pub selector: &'a str,
    /// Whether a missing match is a failure. Defaults to `true`.
    pub required: bool,
}

impl Default for Directive<'static> {
    fn default() -> Self {
        Directive {
            selector: "",
            required: true,
        }
    }
}

impl<'a> Directive<'a> {
    /// Parse a field's metadata. `required` must be a boolean literal
    /// (`"true"` / `"false"`) when present; anything else fails immediately
    /// with [`Error::Directive`], a destination-authoring error rather than a
    /// document-shape mismatch. The ignore marker short-circuits before the
    /// override is examined.
    pub fn parse(selector: &'a str, required: Option<&str>) -> Result<Self> {
        if selector == IGNORE_MARKER {
            return Ok(Directive {
                selector,
                required: true,
            });
        }
        let required = match required {
            None => true,
            Some(literal) => literal.parse::<bool>().map_err(|source| Error::Directive {
                literal: literal.to_owned(),
                source,
            })?,
        };
        Ok(Directive { selector, required })
    }

    /// Whether the selector is the reserved ignore marker.
    pub fn is_ignored(&self) -> bool {
        self.selector == IGNORE_MARKER
    }

    /// Whether the selector ends in a positional `[n]` predicate.
    pub(crate) fn has_index_suffix(&self) -> bool {
        INDEX_SUFFIX.is_match(self.selector)
    }

    /// Whether the selector addresses text nodes directly.
    pub(crate) fn has_text_suffix(&self) -> bool {
        self.selector.ends_with("text()")
    }
}
