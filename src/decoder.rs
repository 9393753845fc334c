//! Parse-once, decode-many wrapper around the decode engine.

use std::io::Read;

use sxd_document::{parser, Package};

use crate::decode::{decode_selection, FromXml};
use crate::error::{Error, Result};
use crate::selection::Selection;

/// Owns a parsed document and decodes destinations against its root.
///
/// The document is parsed exactly once, at construction; every
/// [`decode`](Decoder::decode) call works against the same root, so
/// repeated decodes of different destination shapes do not re-parse.
/// Destinations may borrow nodes from the decoder's document (raw-node
/// capture), as long as they do not outlive it.
pub struct Decoder {
    package: Package,
}

impl Decoder {
    pub fn from_str(xml: &str) -> Result<Self> {
        let package = parser::parse(xml).map_err(|err| Error::Parse(err.to_string()))?;
        Ok(Decoder { package })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_str(std::str::from_utf8(bytes)?)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut xml = String::new();
        reader.read_to_string(&mut xml)?;
        Self::from_str(&xml)
    }

    /// Decode into `dest` against the document root.
    pub fn decode<'s, T: FromXml<'s>>(&'s self, dest: &mut T) -> Result<()> {
        let document = self.package.as_document();
        let root = Selection::new(document.root());
        decode_selection(&root, dest)
    }
}
