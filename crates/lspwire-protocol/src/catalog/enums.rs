//! Closed enumerations.
//!
//! These enumerations do not admit custom values: anything outside the
//! declared set is rejected on decode with
//! [`DecodeError::InvalidEnumValue`](crate::DecodeError::InvalidEnumValue).

use crate::error::DecodeError;
use crate::strict::{StrictDecode, deserialize_strict};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// The wire value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl StrictDecode for $name {
            fn shape_name() -> String {
                stringify!($name).to_string()
            }

            fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
                let text = value
                    .as_str()
                    .ok_or_else(|| DecodeError::type_mismatch(stringify!($name), value))?;
                match text {
                    $( $value => Ok($name::$variant), )+
                    other => Err(DecodeError::InvalidEnumValue {
                        enumeration: stringify!($name).to_string(),
                        value: format!("{other:?}"),
                    }),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_strict(deserializer)
            }
        }
    };
}

macro_rules! integer_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// The wire value.
            pub fn value(self) -> i32 {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.value())
            }
        }

        impl StrictDecode for $name {
            fn shape_name() -> String {
                stringify!($name).to_string()
            }

            fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
                let number = i32::decode_strict(value).map_err(|_| {
                    DecodeError::type_mismatch(stringify!($name), value)
                })?;
                match number {
                    $( $value => Ok($name::$variant), )+
                    other => Err(DecodeError::InvalidEnumValue {
                        enumeration: stringify!($name).to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_strict(deserializer)
            }
        }
    };
}

string_enum! {
    /// Verbosity of `$/logTrace` output.
    TraceValue {
        /// No tracing.
        Off = "off",
        /// Trace messages only.
        Messages = "messages",
        /// Trace messages with verbose detail.
        Verbose = "verbose",
    }
}

string_enum! {
    /// Format of a [`MarkupContent`](super::MarkupContent) value.
    MarkupKind {
        /// Plain text.
        PlainText = "plaintext",
        /// Markdown.
        Markdown = "markdown",
    }
}

integer_enum! {
    /// Severity of a window message.
    MessageType {
        /// An error message.
        Error = 1,
        /// A warning message.
        Warning = 2,
        /// An information message.
        Info = 3,
        /// A log message.
        Log = 4,
        /// A debug message.
        Debug = 5,
    }
}

integer_enum! {
    /// Severity of a diagnostic.
    DiagnosticSeverity {
        /// Reports an error.
        Error = 1,
        /// Reports a warning.
        Warning = 2,
        /// Reports an information.
        Information = 3,
        /// Reports a hint.
        Hint = 4,
    }
}

integer_enum! {
    /// Extra rendering hints for a diagnostic.
    DiagnosticTag {
        /// Unused or unnecessary code.
        Unnecessary = 1,
        /// Deprecated or obsolete code.
        Deprecated = 2,
    }
}

integer_enum! {
    /// Kind of a document highlight.
    DocumentHighlightKind {
        /// A textual occurrence.
        Text = 1,
        /// Read-access of a symbol.
        Read = 2,
        /// Write-access of a symbol.
        Write = 3,
    }
}

integer_enum! {
    /// Why a document is being saved.
    TextDocumentSaveReason {
        /// Explicit user action.
        Manual = 1,
        /// Automatic after a delay.
        AfterDelay = 2,
        /// The editor lost focus.
        FocusOut = 3,
    }
}

integer_enum! {
    /// The kind of a watched file event.
    FileChangeType {
        /// The file was created.
        Created = 1,
        /// The file was changed.
        Changed = 2,
        /// The file was deleted.
        Deleted = 3,
    }
}
