/// Declares a record destination: emits the struct unchanged and implements
/// [`FromXml`](crate::FromXml) for it, decoding one field per declaration.
///
/// Field keys:
///
/// - `#[xpath = "..."]`: selector expression, or the ignore marker `"-"`.
///   A field without one is skipped, unless its type is a record or a
///   custom-decodable, which then decodes against the enclosing scope.
/// - `#[xpath_required = "..."]`: boolean literal overriding the default
///   required policy; validated when the field is decoded.
///
/// The struct must implement `Default` (derive it as usual). A single
/// lifetime parameter is supported for records capturing raw nodes:
///
/// ```
/// use xtag::{decodable, NodeList};
///
/// decodable! {
///     #[derive(Debug, Default)]
///     pub struct Items<'d> {
///         #[xpath = ".//item"]
///         pub nodes: NodeList<'d>,
///     }
/// }
///
/// let decoder = xtag::Decoder::from_str("<list><item/><item/></list>")?;
/// let mut items = Items::default();
/// decoder.decode(&mut items)?;
/// assert_eq!(items.nodes.len(), 2);
/// # Ok::<(), xtag::Error>(())
/// ```
#[macro_export]
macro_rules! decodable {
    (@selector) => {
        ""
    };
    (@selector $selector:literal) => {
        $selector
    };
    (@required) => {
        ::core::option::Option::None
    };
    (@required $required:literal) => {
        ::core::option::Option::Some($required)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$lt:lifetime> {
            $(
                $(#[xpath = $selector:literal])?
                $(#[xpath_required = $required:literal])?
                $fvis:vis $field:ident : $ftype:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name<$lt> {
            $( $fvis $field : $ftype, )*
        }

        impl<$lt> $crate::FromXml<$lt> for $name<$lt> {
            const KIND: $crate::Kind = $crate::Kind::Record;

            fn decode(
                &mut self,
                selection: &$crate::Selection<$lt>,
                _directive: &$crate::Directive<'_>,
            ) -> ::core::result::Result<(), $crate::Error> {
                $(
                    $crate::decode::field::<Self, _>(
                        &mut self.$field,
                        selection,
                        ::core::stringify!($field),
                        $crate::decodable!(@selector $($selector)?),
                        $crate::decodable!(@required $($required)?),
                    )?;
                )*
                ::core::result::Result::Ok(())
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[xpath = $selector:literal])?
                $(#[xpath_required = $required:literal])?
                $fvis:vis $field:ident : $ftype:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field : $ftype, )*
        }

        impl<'xtag> $crate::FromXml<'xtag> for $name {
            const KIND: $crate::Kind = $crate::Kind::Record;

            fn decode(
                &mut self,
                selection: &$crate::Selection<'xtag>,
                _directive: &$crate::Directive<'_>,
            ) -> ::core::result::Result<(), $crate::Error> {
                $(
                    $crate::decode::field::<Self, _>(
                        &mut self.$field,
                        selection,
                        ::core::stringify!($field),
                        $crate::decodable!(@selector $($selector)?),
                        $crate::decodable!(@required $($required)?),
                    )?;
                )*
                ::core::result::Result::Ok(())
            }
        }
    };
}
