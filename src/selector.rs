//! Bridge to the XPath engine.
//!
//! Selector expressions are opaque to this crate: they are handed to
//! sxd-xpath unchanged and the matches come back in document order. No
//! compiled-expression cache is kept; compilation is cheap relative to
//! evaluation and a process-wide cache would be shared mutable state for no
//! measurable win.

use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};

use crate::error::{Error, Result};

/// Evaluate `expr` relative to `context_node`, returning matches in document
/// order. A selector that evaluates to a non-node value (number, string,
/// boolean) matches nothing.
pub(crate) fn apply<'d>(context_node: Node<'d>, expr: &str) -> Result<Vec<Node<'d>>> {
    let factory = Factory::new();
    let xpath = factory
        .build(expr)
        .map_err(|err| Error::Selector {
            selector: expr.to_owned(),
            detail: err.to_string(),
        })?
        .ok_or_else(|| Error::Selector {
            selector: expr.to_owned(),
            detail: "empty selector expression".to_owned(),
        })?;

    let context = Context::new();
    let value = xpath.evaluate(&context, context_node).map_err(|err| Error::Selector {
        selector: expr.to_owned(),
        detail: err.to_string(),
    })?;

    match value {
        Value::Nodeset(set) => Ok(set.document_order()),
        other => {
            log::debug!("selector '{expr}' evaluated to a non-node value ({other:?}); treating as no match");
            Ok(Vec::new())
        }
    }
}
