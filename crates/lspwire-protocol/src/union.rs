//! Untagged unions.
//!
//! Protocol fields are often typed as an alternation (`Location | Location[]`,
//! `string | integer`, ...) with nothing on the wire saying which alternative
//! is present. [`OneOf2`] through [`OneOf5`] hold exactly one alternative and
//! pick it by structural fit: each alternative is decoded strictly, in
//! declaration order, and the first clean decode wins. When none fits the
//! error lists every alternative tried and why it failed.
//!
//! The `NullableOneOfN` variants add a distinct `Null` member for the wire
//! `null`; the plain unions reject `null` outright.
//!
//! Encoding writes the populated alternative directly, without a tag.

use crate::error::{Attempt, DecodeError};
use crate::strict::{StrictDecode, deserialize_strict};
use lspwire_core::logging::targets;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

macro_rules! one_of {
    (
        $(#[$meta:meta])*
        $name:ident, $nullable:ident; $( $var:ident = $idx:literal ),+
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name<$($var),+> {
            $(
                #[allow(missing_docs)]
                $var($var),
            )+
        }

        impl<$($var),+> $name<$($var),+> {
            /// Zero-based position of the populated alternative.
            pub fn index(&self) -> usize {
                match self {
                    $( Self::$var(_) => $idx, )+
                }
            }
        }

        impl<$($var: StrictDecode),+> $name<$($var),+> {
            /// Shape names of the alternatives, in declaration order.
            pub fn alternatives() -> Vec<String> {
                vec![$( <$var as StrictDecode>::shape_name() ),+]
            }

            fn try_alternatives(
                value: &Value,
                union: fn() -> String,
            ) -> Result<Self, DecodeError> {
                let mut attempts = Vec::new();
                $(
                    match <$var as StrictDecode>::decode_strict(value) {
                        Ok(decoded) => {
                            log::trace!(
                                target: targets::UNION,
                                "{}: alternative {} ({}) matched",
                                union(),
                                $idx,
                                <$var as StrictDecode>::shape_name()
                            );
                            return Ok(Self::$var(decoded));
                        }
                        Err(err) => attempts.push(Attempt {
                            shape: <$var as StrictDecode>::shape_name(),
                            reason: err.to_string(),
                        }),
                    }
                )+
                log::debug!(target: targets::UNION, "{}: no alternative matched", union());
                Err(DecodeError::NoMatchingAlternative {
                    union: union(),
                    attempts,
                })
            }
        }

        impl<$($var: StrictDecode),+> StrictDecode for $name<$($var),+> {
            fn shape_name() -> String {
                format!("{}<{}>", stringify!($name), Self::alternatives().join(", "))
            }

            fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
                if value.is_null() {
                    return Err(DecodeError::NullNotAllowed {
                        union: Self::shape_name(),
                    });
                }
                Self::try_alternatives(value, Self::shape_name)
            }
        }

        impl<$($var: Serialize),+> Serialize for $name<$($var),+> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $( Self::$var(inner) => inner.serialize(serializer), )+
                }
            }
        }

        impl<'de, $($var: StrictDecode),+> Deserialize<'de> for $name<$($var),+> {
            fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
                deserialize_strict(deserializer)
            }
        }

        #[doc = concat!("[`", stringify!($name), "`] that also admits the wire `null`.")]
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $nullable<$($var),+> {
            /// The wire `null`.
            Null,
            $(
                #[allow(missing_docs)]
                $var($var),
            )+
        }

        impl<$($var),+> Default for $nullable<$($var),+> {
            fn default() -> Self {
                Self::Null
            }
        }

        impl<$($var),+> $nullable<$($var),+> {
            /// Returns true for the `Null` member.
            pub fn is_null(&self) -> bool {
                matches!(self, Self::Null)
            }

            /// Converts to the non-nullable union, mapping `Null` to `None`.
            pub fn into_option(self) -> Option<$name<$($var),+>> {
                match self {
                    Self::Null => None,
                    $( Self::$var(inner) => Some($name::$var(inner)), )+
                }
            }
        }

        impl<$($var),+> From<$name<$($var),+>> for $nullable<$($var),+> {
            fn from(value: $name<$($var),+>) -> Self {
                match value {
                    $( $name::$var(inner) => Self::$var(inner), )+
                }
            }
        }

        impl<$($var),+> From<Option<$name<$($var),+>>> for $nullable<$($var),+> {
            fn from(value: Option<$name<$($var),+>>) -> Self {
                value.map_or(Self::Null, Self::from)
            }
        }

        impl<$($var: StrictDecode),+> StrictDecode for $nullable<$($var),+> {
            fn shape_name() -> String {
                format!(
                    "{}<{}>",
                    stringify!($nullable),
                    $name::<$($var),+>::alternatives().join(", ")
                )
            }

            fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
                if value.is_null() {
                    return Ok(Self::Null);
                }
                $name::<$($var),+>::try_alternatives(value, Self::shape_name).map(Self::from)
            }
        }

        impl<$($var: Serialize),+> Serialize for $nullable<$($var),+> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    Self::Null => serializer.serialize_unit(),
                    $( Self::$var(inner) => inner.serialize(serializer), )+
                }
            }
        }

        impl<'de, $($var: StrictDecode),+> Deserialize<'de> for $nullable<$($var),+> {
            fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
                deserialize_strict(deserializer)
            }
        }
    };
}

one_of! {
    /// One of two alternatives, chosen by structural fit.
    OneOf2, NullableOneOf2; A = 0, B = 1
}

one_of! {
    /// One of three alternatives, chosen by structural fit.
    OneOf3, NullableOneOf3; A = 0, B = 1, C = 2
}

one_of! {
    /// One of four alternatives, chosen by structural fit.
    OneOf4, NullableOneOf4; A = 0, B = 1, C = 2, D = 3
}

one_of! {
    /// One of five alternatives, chosen by structural fit.
    OneOf5, NullableOneOf5; A = 0, B = 1, C = 2, D = 3, E = 4
}

/// A fixed two-element array, `[A, B]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<A, B>(pub A, pub B);

impl<A: StrictDecode, B: StrictDecode> StrictDecode for Tuple<A, B> {
    fn shape_name() -> String {
        format!("[{}, {}]", A::shape_name(), B::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        match value.as_array().map(Vec::as_slice) {
            Some([first, second]) => Ok(Tuple(
                A::decode_strict(first).map_err(|e| e.at_index(0))?,
                B::decode_strict(second).map_err(|e| e.at_index(1))?,
            )),
            _ => Err(DecodeError::type_mismatch(Self::shape_name(), value)),
        }
    }
}

impl<A: Serialize, B: Serialize> Serialize for Tuple<A, B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.0)?;
        tuple.serialize_element(&self.1)?;
        tuple.end()
    }
}

impl<'de, A: StrictDecode, B: StrictDecode> Deserialize<'de> for Tuple<A, B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_strict(deserializer)
    }
}
