//! The recursive decode engine.
//!
//! Every destination type implements [`FromXml`] and declares its capability
//! as a [`Kind`]; the dispatch is resolved statically per type, not probed
//! per call. Records narrow the working [`Selection`] per field via the
//! selector engine, sequences fan out over matched nodes, scalars coerce the
//! selection's text, and custom types take the raw node list. Failures build
//! a [`DecodeError`] frame at the point of failure and every enclosing level
//! wraps it on the way out.
//!
//! There is no rollback: a failed decode leaves sibling fields mutated by
//! earlier iterations in place.

mod containers;
mod scalars;

pub use containers::NodeList;
pub use scalars::Any;

use sxd_document::parser;
use sxd_xpath::nodeset::Node;

use crate::directive::{Directive, IGNORE_MARKER};
use crate::error::{BoxError, DecodeError, Error, Reason, Result, Segment};
use crate::selection::Selection;

/// Decoding capability of a destination type, declared once per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Leaf value parsed from the selection's trimmed text.
    Scalar,
    /// Named fields, each with its own selector directive.
    Record,
    /// Growable sequence, one element per matched node.
    Sequence,
    /// Fixed-length sequence requiring an exact node-count match.
    Array,
    /// Mapping destinations are rejected.
    Map,
    /// Open destination resolving to text without coercion.
    Open,
    /// Raw node handles appended without any interpretation.
    RawNodes,
    /// Type supplying its own hook over the raw node list.
    Custom,
}

/// A destination the decode engine can populate in place.
///
/// Structural types ([`Kind::Record`] and friends) implement [`decode`];
/// custom-decodable types declare [`Kind::Custom`] and implement
/// [`decode_nodes`] instead; the default `decode` routes to the hook and
/// wraps its failure as a [`Reason::CustomDecode`] frame carrying the hook's
/// error as the chain tail.
///
/// [`decode`]: FromXml::decode
/// [`decode_nodes`]: FromXml::decode_nodes
pub trait FromXml<'d>: Default {
    const KIND: Kind;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        let _ = directive;
        self.decode_nodes(selection.nodes())
            .map_err(|err| DecodeError::custom::<Self>(err).into())
    }

    /// Custom decode hook over the raw matched nodes.
    fn decode_nodes(&mut self, nodes: &[Node<'d>]) -> std::result::Result<(), BoxError> {
        let _ = nodes;
        Ok(())
    }
}

/// Decode a document given as bytes into `dest`.
///
/// The bytes are parsed by the external markup parser; the root node becomes
/// a one-element [`Selection`] and decoding recurses from there. The
/// destination must be an owned type; captures borrowing document nodes go
/// through [`decode_selection`] or [`crate::Decoder`].
pub fn decode<T>(bytes: &[u8], dest: &mut T) -> Result<()>
where
    T: for<'d> FromXml<'d>,
{
    let xml = std::str::from_utf8(bytes)?;
    decode_str(xml, dest)
}

/// Decode a document given as a string into `dest`.
pub fn decode_str<T>(xml: &str, dest: &mut T) -> Result<()>
where
    T: for<'d> FromXml<'d>,
{
    let package = parser::parse(xml).map_err(|err| Error::Parse(err.to_string()))?;
    let document = package.as_document();
    let root = Selection::new(document.root());
    decode_selection(&root, dest)
}

/// Decode a working selection into `dest`. This is the recursion entry
/// custom hooks use to decode their inner structure.
pub fn decode_selection<'d, T: FromXml<'d>>(selection: &Selection<'d>, dest: &mut T) -> Result<()> {
    dest.decode(selection, &Directive::default())
}

/// Decode one record field. Called by `decodable!`-generated record
/// implementations; `R` is the enclosing record (for error frames), `T` the
/// field's type.
pub fn field<'d, R, T>(
    dest: &mut T,
    scope: &Selection<'d>,
    name: &'static str,
    selector: &'static str,
    required: Option<&'static str>,
) -> Result<()>
where
    T: FromXml<'d>,
{
    if selector == IGNORE_MARKER {
        return Ok(());
    }
    // No selector: records and custom hooks decode against the enclosing
    // scope (embedded shapes, hooks needing parent context); anything else
    // is left untouched.
    if selector.is_empty() && !matches!(T::KIND, Kind::Record | Kind::Custom) {
        return Ok(());
    }

    let directive = Directive::parse(selector, required)?;
    let selection = resolve::<T>(scope, &directive)?;

    if selection.is_empty() {
        if !directive.required {
            log::trace!("field {name}: selector {selector:?} matched nothing, leaving default");
            return Ok(());
        }
        return Err(DecodeError::new::<R>(Reason::NodeNotFound)
            .with_selector(selector)
            .into());
    }

    dest.decode(&selection, &directive)
        .map_err(|err| wrap::<R>(err, Segment::Field(name), selector))
}

/// Narrow `scope` for a destination of type `T`, enforcing single-match
/// resolution where the selector addresses a logically single value: any
/// scalar selector not ending in `text()`, and for other kinds a selector
/// pinned by a positional `[n]` suffix. `text()`-suffixed selectors always
/// multi-match, since their text nodes concatenate.
fn resolve<'d, T: FromXml<'d>>(
    scope: &Selection<'d>,
    directive: &Directive<'_>,
) -> Result<Selection<'d>> {
    if directive.selector.is_empty() {
        return Ok(scope.clone());
    }
    let matched = scope.narrow(directive.selector)?;
    let single = match T::KIND {
        Kind::Scalar => !directive.has_text_suffix(),
        _ => directive.has_index_suffix() && !directive.has_text_suffix(),
    };
    if single && matched.len() > 1 {
        return Err(DecodeError::new::<T>(Reason::MultipleNodesDetected)
            .with_selector(directive.selector)
            .into());
    }
    log::trace!(
        "selector {:?} matched {} node(s)",
        directive.selector,
        matched.len()
    );
    Ok(matched)
}

/// Wrap a callee's error in a `TypeConversion` frame for the enclosing
/// destination `R`, recording which field or index was being decoded.
pub(crate) fn wrap<R>(err: Error, segment: Segment, selector: &str) -> Error {
    let mut frame = DecodeError::new::<R>(Reason::TypeConversion)
        .with_selector(selector)
        .absorb(err);
    frame.field = Some(segment);
    frame.into()
}
