//! [`cbor!`], a JSON-`json!`-like macro for building [`crate::value::Element`]
//! trees.
//!
//! Unlike the per-type codecs, tree construction from a literal can't
//! meaningfully fail, so `cbor!` is infallible and returns `Element`
//! directly (the teacher's own `cbor!` returns a `Result` because its tree
//! enforces canonical key ordering and bignum promotion at construction
//! time; neither applies here).
//!
//! Map key rules (same ergonomics as `serde_json::json!`):
//! - `{ a: 1 }` uses the literal key `"a"` (identifier stringized)
//! - `{ "a": 1 }` uses the literal string key `"a"`
//! - `{ (k): 1 }` uses the expression `k` as the key
//!
//! ```ignore
//! # use streamcbor::cbor;
//! let user_key = "dynamic";
//! let v = cbor!({
//!     a: 1,
//!     (user_key): [true, null, "x"],
//! });
//! ```

/// Construct an [`crate::value::Element`] using a JSON-like literal syntax.
///
/// Supported forms:
/// - `cbor!(null)`
/// - `cbor!(true)` / `cbor!(false)`
/// - `cbor!([ ... ])`
/// - `cbor!({ key: value, "key": value, (expr_key): value, ... })`
/// - `cbor!(expr)` where `expr` implements [`__cbor_macro::IntoElement`]
///   (covers primitives, `&str`, `String`, `&[u8]`, `Vec<u8>`, and `Element`
///   itself).
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
#[macro_export]
macro_rules! cbor {
    (null) => {
        $crate::value::Element::null()
    };
    (true) => {
        $crate::value::Element::bool(true)
    };
    (false) => {
        $crate::value::Element::bool(false)
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let mut items = $crate::__cbor_macro::Vec::new();
        $(
            items.push($crate::cbor!($elem));
        )*
        $crate::value::Element::Array(items, false)
    }};

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let mut entries = $crate::__cbor_macro::Vec::new();
        $(
            let k = $crate::__cbor_key!($key);
            let v = $crate::cbor!($value);
            entries.push((k, v));
        )*
        $crate::value::Element::Map(entries, false)
    }};

    ($other:expr) => {{
        $crate::__cbor_macro::IntoElement::into_element($other)
    }};
}

/// Internal helper for map keys: `ident` becomes the text key `"ident"`;
/// `"literal"` is taken verbatim; `(expr)` evaluates `expr` as the key
/// element.
#[doc(hidden)]
#[cfg(feature = "alloc")]
#[macro_export]
macro_rules! __cbor_key {
    ($key:ident) => {
        $crate::value::Element::text(::core::stringify!($key))
    };
    (($key:expr)) => {
        $crate::__cbor_macro::IntoElement::into_element($key)
    };
    ($key:literal) => {
        $crate::value::Element::text($key)
    };
}

/// Hidden support module used by `cbor!` expansions; re-exported at crate
/// root as `__cbor_macro`.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __cbor_macro {
    pub use alloc::vec::Vec;

    use crate::value::{Element, Scalar};

    /// Converts a plain Rust value into a tree [`Element`], for use inside
    /// `cbor!`'s expression fallback arm.
    pub trait IntoElement {
        /// Perform the conversion.
        fn into_element(self) -> Element;
    }

    impl IntoElement for Element {
        fn into_element(self) -> Element {
            self
        }
    }

    impl IntoElement for &Element {
        fn into_element(self) -> Element {
            self.clone()
        }
    }

    impl IntoElement for bool {
        fn into_element(self) -> Element {
            Element::bool(self)
        }
    }

    impl IntoElement for () {
        fn into_element(self) -> Element {
            Element::null()
        }
    }

    impl<T: IntoElement> IntoElement for Option<T> {
        fn into_element(self) -> Element {
            self.map_or_else(Element::null, IntoElement::into_element)
        }
    }

    impl IntoElement for &str {
        fn into_element(self) -> Element {
            Element::text(self)
        }
    }

    impl IntoElement for alloc::string::String {
        fn into_element(self) -> Element {
            Element::text(self)
        }
    }

    impl IntoElement for &[u8] {
        fn into_element(self) -> Element {
            Element::bytes(self.to_vec())
        }
    }

    impl IntoElement for Vec<u8> {
        fn into_element(self) -> Element {
            Element::bytes(self)
        }
    }

    impl IntoElement for f64 {
        fn into_element(self) -> Element {
            Element::Value(Scalar::Double(self))
        }
    }

    impl IntoElement for f32 {
        fn into_element(self) -> Element {
            Element::Value(Scalar::Float(self))
        }
    }

    macro_rules! impl_into_element_int {
        ($($t:ty),* $(,)?) => {$(
            impl IntoElement for $t {
                fn into_element(self) -> Element {
                    Element::int(i64::from(self))
                }
            }
        )*};
    }

    impl_into_element_int!(i8, i16, i32, i64, u8, u16, u32);
}

#[cfg(test)]
mod tests {
    use crate::value::Element;

    #[test]
    fn builds_nested_structure() {
        let user_key = "dynamic";
        let v = cbor!({
            a: 1,
            (user_key): [true, null, "x"],
        });
        match v {
            Element::Map(entries, false) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, Element::text("a"));
                assert_eq!(entries[0].1, Element::int(1));
                assert_eq!(entries[1].0, Element::text("dynamic"));
            }
            _ => panic!("expected a map"),
        }
    }

    #[test]
    fn array_literal() {
        let v = cbor!([1, 2, 3]);
        assert_eq!(
            v,
            Element::Array(
                alloc::vec![Element::int(1), Element::int(2), Element::int(3)],
                false
            )
        );
    }
}
