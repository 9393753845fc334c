//! Error types for declarative decoding.
//!
//! Two tiers: [`Error`] is the crate-level enum covering everything that can
//! go wrong around a decode (unreadable input, malformed document, bad
//! selector, bad field metadata), while [`DecodeError`] is one frame of a
//! decode failure. Frames chain from the outermost destination down to the
//! failing leaf; each enclosing level wraps its callee's error in a fresh
//! frame and never mutates it. Rendering a frame reconstructs the full field
//! path (`.name`, `[i]`) from the chain.

use std::fmt;

use thiserror::Error as ThisError;

/// Opaque error payload carried at the end of a frame chain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure produced while decoding a document.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Reading the input stream failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The input bytes are not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The document is not well-formed markup.
    #[error("malformed document: {0}")]
    Parse(String),

    /// A selector expression did not compile or evaluate.
    #[error("invalid selector '{selector}': {detail}")]
    Selector { selector: String, detail: String },

    /// A field's required-override is not a boolean literal. This is an
    /// authoring error in the destination type, not a document-shape
    /// mismatch, so it is never wrapped into a frame chain at the level
    /// where it occurs.
    #[error("required override {literal:?} is not a boolean literal")]
    Directive {
        literal: String,
        #[source]
        source: std::str::ParseBoolError,
    },

    /// A decode failure with its full frame chain.
    #[error(transparent)]
    Decode(Box<DecodeError>),
}

impl Error {
    /// The frame chain, when this error is a decode failure.
    pub fn frame(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(frame) => Some(frame),
            _ => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(frame: DecodeError) -> Self {
        Error::Decode(Box::new(frame))
    }
}

/// Why a single decode step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// A required selector matched nothing.
    NodeNotFound,
    /// A selector addressing a single value matched more than one node.
    MultipleNodesDetected,
    /// A fixed-length destination did not match the node count exactly.
    ArrayLengthMismatch,
    /// Mapping destinations are not supported.
    UnsupportedMapping,
    /// A nested decode or a literal coercion failed.
    TypeConversion,
    /// A custom decode hook reported an error.
    CustomDecode,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::NodeNotFound => "node not found in document",
            Reason::MultipleNodesDetected => "multiple nodes detected for selector",
            Reason::ArrayLengthMismatch => "array length does not match document elements found",
            Reason::UnsupportedMapping => "map type is not currently supported",
            Reason::TypeConversion => "a type conversion error occurred",
            Reason::CustomDecode => "a custom decoder implementation returned an error",
        };
        f.write_str(text)
    }
}

/// One hop of the destination path: a record field or a sequence index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Field(&'static str),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// One frame of a decode failure.
///
/// Consumers walking the chain programmatically should match on [`reason`]
/// rather than message text; [`unwind`] flattens the chain for inspection.
///
/// [`reason`]: DecodeError::reason
/// [`unwind`]: DecodeError::unwind
#[derive(Debug)]
pub struct DecodeError {
    /// What went wrong at this level.
    pub reason: Reason,
    /// The wrapped frame from the level below, if the failure was deeper.
    pub cause: Option<Box<DecodeError>>,
    /// A non-frame error terminating the chain (a parse error, a custom
    /// hook's error, an authoring error surfaced from a nested record).
    pub tail: Option<BoxError>,
    /// The literal text whose coercion failed, when one was involved.
    pub value: Option<String>,
    /// The field or index this frame's level was decoding into.
    pub field: Option<Segment>,
    /// Fully-qualified name of the destination type at this level.
    pub type_name: &'static str,
    /// The selector expression in play at this level, if any.
    pub selector: Option<String>,
}

impl DecodeError {
    pub(crate) fn new<T: ?Sized>(reason: Reason) -> Self {
        DecodeError {
            reason,
            cause: None,
            tail: None,
            value: None,
            field: None,
            type_name: std::any::type_name::<T>(),
            selector: None,
        }
    }

    /// A `CustomDecode` frame carrying a hook's error as the chain tail.
    pub(crate) fn custom<T: ?Sized>(err: BoxError) -> Self {
        let mut frame = Self::new::<T>(Reason::CustomDecode);
        frame.tail = Some(err);
        frame
    }

    pub(crate) fn with_selector(mut self, selector: &str) -> Self {
        if !selector.is_empty() {
            self.selector = Some(selector.to_owned());
        }
        self
    }

    pub(crate) fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    pub(crate) fn with_tail(mut self, err: BoxError) -> Self {
        self.tail = Some(err);
        self
    }

    /// Absorb a callee's error: a frame becomes this frame's cause, anything
    /// else terminates the chain as the tail.
    pub(crate) fn absorb(mut self, err: Error) -> Self {
        match err {
            Error::Decode(frame) => self.cause = Some(frame),
            other => self.tail = Some(Box::new(other)),
        }
        self
    }

    /// Flatten the chain from this frame (outermost) to the failing leaf.
    pub fn unwind(&self) -> Unwound<'_> {
        let mut chain = Vec::new();
        let mut value = None;
        let mut frame = self;
        loop {
            chain.push(frame);
            if let Some(v) = frame.value.as_deref() {
                value = Some(v);
            }
            match frame.cause.as_deref() {
                Some(next) => frame = next,
                None => break,
            }
        }
        let tail = frame
            .tail
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static));
        Unwound { chain, value, tail }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unwound = self.unwind();
        let leaf = *unwound.chain.last().expect("chain has at least one frame");

        write!(f, "could not unmarshal ")?;
        if let Some(value) = unwound.value {
            write!(f, "value {value:?} ")?;
        }

        let mut path = String::new();
        for frame in &unwound.chain {
            if let Some(segment) = &frame.field {
                path.push_str(&segment.to_string());
            }
        }

        write!(
            f,
            "into '{}{}' (type {}): {}",
            display_type_name(self.type_name),
            path,
            display_type_name(leaf.type_name),
            leaf.reason,
        )?;

        if let Some(selector) = &leaf.selector {
            write!(f, " tag: '{selector}'")?;
        }
        if let Some(tail) = unwound.tail {
            write!(f, ": {tail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(cause) = self.cause.as_deref() {
            return Some(cause);
        }
        self.tail
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// A flattened frame chain, outermost first.
#[derive(Debug)]
pub struct Unwound<'a> {
    /// Every frame from the reported error down to the failing leaf.
    pub chain: Vec<&'a DecodeError>,
    /// The deepest literal captured along the chain.
    pub value: Option<&'a str>,
    /// The non-frame error terminating the chain, if one exists.
    pub tail: Option<&'a (dyn std::error::Error + 'static)>,
}

/// Strip module paths from a `type_name` rendering, keeping generics:
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub(crate) fn display_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut run = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            run.push(ch);
        } else {
            flush_path_run(&mut out, &mut run);
            out.push(ch);
        }
    }
    flush_path_run(&mut out, &mut run);
    out
}

fn flush_path_run(out: &mut String, run: &mut String) {
    if run.is_empty() {
        return;
    }
    out.push_str(run.rsplit("::").next().unwrap_or(run));
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_drop_module_paths() {
        assert_eq!(display_type_name("i32"), "i32");
        assert_eq!(display_type_name("alloc::string::String"), "String");
        assert_eq!(
            display_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(
            display_type_name("std::collections::hash::map::HashMap<i32, alloc::string::String>"),
            "HashMap<i32, String>"
        );
        assert_eq!(display_type_name("[my_crate::a::B; 5]"), "[B; 5]");
    }

    #[test]
    fn unwind_captures_deepest_value_and_tail() {
        let leaf = DecodeError::new::<i32>(Reason::TypeConversion)
            .with_value("oops")
            .with_tail("boom".parse::<i32>().unwrap_err().into());
        let mid = DecodeError::new::<Vec<i32>>(Reason::TypeConversion).absorb(leaf.into());
        let outer = DecodeError::new::<Vec<Vec<i32>>>(Reason::TypeConversion).absorb(mid.into());

        let unwound = outer.unwind();
        assert_eq!(unwound.chain.len(), 3);
        assert_eq!(unwound.value, Some("oops"));
        assert!(unwound.tail.is_some());
    }

    #[test]
    fn display_renders_path_and_tail() {
        let mut leaf = DecodeError::new::<i32>(Reason::TypeConversion)
            .with_selector(".//foo")
            .with_value("true")
            .with_tail("true".parse::<i32>().unwrap_err().into());
        leaf.field = None;
        let mut outer = DecodeError::new::<Vec<i32>>(Reason::TypeConversion).absorb(leaf.into());
        outer.field = Some(Segment::Index(2));

        let rendered = outer.to_string();
        assert!(
            rendered.starts_with("could not unmarshal value \"true\" into 'Vec<i32>[2]' (type i32)"),
            "unexpected rendering: {rendered}"
        );
        assert!(rendered.contains("a type conversion error occurred tag: './/foo': "));
    }
}
