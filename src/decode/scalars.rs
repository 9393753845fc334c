//! Leaf destinations: scalars parsed from a selection's trimmed text, and
//! the open [`Any`] destination that takes the text as-is.
//!
//! Coercion policy: empty text leaves a numeric or boolean destination at
//! its default (an empty element is absence, not zero); a parse failure on a
//! not-required field also keeps the default; a parse failure on a required
//! field is a `TypeConversion` frame carrying the offending literal and the
//! parse error as the chain tail.

use std::str::FromStr;

use thiserror::Error as ThisError;

use super::{FromXml, Kind};
use crate::directive::Directive;
use crate::error::{BoxError, DecodeError, Error, Reason, Result};
use crate::selection::Selection;

#[derive(Debug, ThisError)]
#[error("unsigned value cannot start with a sign")]
struct LeadingSign;

fn conversion<T: ?Sized>(literal: &str, err: BoxError, directive: &Directive<'_>) -> Error {
    DecodeError::new::<T>(Reason::TypeConversion)
        .with_selector(directive.selector)
        .with_value(literal)
        .with_tail(err)
        .into()
}

fn decode_number<'d, T>(
    dest: &mut T,
    selection: &Selection<'d>,
    directive: &Directive<'_>,
    reject_sign: bool,
) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = selection.text();
    let literal = text.trim();
    if literal.is_empty() {
        return Ok(());
    }
    // std accepts a leading '+' even for unsigned types; unsigned
    // destinations reject any sign.
    if reject_sign && matches!(literal.as_bytes().first(), Some(b'+' | b'-')) {
        if directive.required {
            return Err(conversion::<T>(literal, Box::new(LeadingSign), directive));
        }
        return Ok(());
    }
    match literal.parse::<T>() {
        Ok(value) => {
            *dest = value;
            Ok(())
        }
        Err(_) if !directive.required => Ok(()),
        Err(err) => Err(conversion::<T>(literal, Box::new(err), directive)),
    }
}

macro_rules! signed_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl<'d> FromXml<'d> for $ty {
            const KIND: Kind = Kind::Scalar;

            fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
                decode_number(self, selection, directive, false)
            }
        }
    )*};
}

macro_rules! unsigned_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl<'d> FromXml<'d> for $ty {
            const KIND: Kind = Kind::Scalar;

            fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
                decode_number(self, selection, directive, true)
            }
        }
    )*};
}

signed_scalars!(i8, i16, i32, i64, isize, f32, f64);
unsigned_scalars!(u8, u16, u32, u64, usize);

impl<'d> FromXml<'d> for bool {
    const KIND: Kind = Kind::Scalar;

    fn decode(&mut self, selection: &Selection<'d>, directive: &Directive<'_>) -> Result<()> {
        let text = selection.text();
        let literal = text.trim();
        // Only the canonical literals, case-sensitive.
        match literal.parse::<bool>() {
            Ok(value) => {
                *self = value;
                Ok(())
            }
            Err(_) if !directive.required => Ok(()),
            Err(err) => Err(conversion::<bool>(literal, Box::new(err), directive)),
        }
    }
}

impl<'d> FromXml<'d> for String {
    const KIND: Kind = Kind::Scalar;

    fn decode(&mut self, selection: &Selection<'d>, _directive: &Directive<'_>) -> Result<()> {
        *self = selection.text().trim().to_owned();
        Ok(())
    }
}

/// Open destination: takes the trimmed text of whatever the selector
/// matched, with no coercion and no single-match policing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Any(pub String);

impl Any {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Any> for String {
    fn from(any: Any) -> String {
        any.0
    }
}

impl<'d> FromXml<'d> for Any {
    const KIND: Kind = Kind::Open;

    fn decode(&mut self, selection: &Selection<'d>, _directive: &Directive<'_>) -> Result<()> {
        self.0 = selection.text().trim().to_owned();
        Ok(())
    }
}
