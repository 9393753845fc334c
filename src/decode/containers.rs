//! Structural destinations: sequences, fixed-length arrays, optional
//! indirections, rejected mappings, and raw node capture.

use std::collections::{BTreeMap, HashMap};

use sxd_xpath::nodeset::Node;

use super::{wrap, FromXml, Kind};
use crate::directive::Directive;
use crate::error::{BoxError, DecodeError, Reason, Result, Segment};
use crate::selection::Selection;

impl<'d, T: FromXml<'d>> FromXml<'d> for Vec<T> {
    const KIND: Kind = Kind::Sequence;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        self.clear();
        for index in 0..selection.len() {
            let mut element = T::default();
            element
                .decode(&selection.at(index as isize), directive)
                .map_err(|err| wrap::<Self>(err, Segment::Index(index), directive.selector))?;
            self.push(element);
        }
        Ok(())
    }
}

impl<'d, T, const N: usize> FromXml<'d> for [T; N]
where
    T: FromXml<'d>,
    [T; N]: Default,
{
    const KIND: Kind = Kind::Array;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        // Exact-length only; there is no partial fill.
        if selection.len() != N {
            return Err(DecodeError::new::<Self>(Reason::ArrayLengthMismatch)
                .with_selector(directive.selector)
                .into());
        }
        for (index, slot) in self.iter_mut().enumerate() {
            slot.decode(&selection.at(index as isize), directive)
                .map_err(|err| wrap::<Self>(err, Segment::Index(index), directive.selector))?;
        }
        Ok(())
    }
}

/// Optional indirection: allocated (`Default`) and bound only when
/// structural decoding actually proceeds. An absent not-required field never
/// reaches this point, so the reference stays `None` with no allocation.
impl<'d, T: FromXml<'d>> FromXml<'d> for Option<T> {
    const KIND: Kind = T::KIND;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        self.get_or_insert_with(T::default).decode(selection, directive)
    }

    fn decode_nodes(&mut self, nodes: &[Node<'d>]) -> std::result::Result<(), BoxError> {
        self.get_or_insert_with(T::default).decode_nodes(nodes)
    }
}

impl<'d, T: FromXml<'d>> FromXml<'d> for Box<T> {
    const KIND: Kind = T::KIND;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        (**self).decode(selection, directive)
    }

    fn decode_nodes(&mut self, nodes: &[Node<'d>]) -> std::result::Result<(), BoxError> {
        (**self).decode_nodes(nodes)
    }
}

impl<'d, K, V, S: Default> FromXml<'d> for HashMap<K, V, S> {
    const KIND: Kind = Kind::Map;

    fn decode(&mut self, _selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        Err(DecodeError::new::<Self>(Reason::UnsupportedMapping)
            .with_selector(directive.selector)
            .into())
    }
}

impl<'d, K, V> FromXml<'d> for BTreeMap<K, V> {
    const KIND: Kind = Kind::Map;

    fn decode(&mut self, _selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        Err(DecodeError::new::<Self>(Reason::UnsupportedMapping)
            .with_selector(directive.selector)
            .into())
    }
}

/// Raw-node capture: matched handles are appended untouched, bypassing all
/// coercion. Borrows the document, so it is reachable through
/// [`decode_selection`](super::decode_selection) and
/// [`Decoder`](crate::Decoder), not the owned byte-slice entry point.
#[derive(Debug, Clone, Default)]
pub struct NodeList<'d>(pub Vec<Node<'d>>);

impl<'d> NodeList<'d> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn nodes(&self) -> &[Node<'d>] {
        &self.0
    }
}

impl<'d> FromXml<'d> for NodeList<'d> {
    const KIND: Kind = Kind::RawNodes;

    fn decode(&mut self, selection: &Selection<'d>, _directive: &Directive<'_>) -> Result<()> {
        self.0.extend_from_slice(selection.nodes());
        Ok(())
    }
}
