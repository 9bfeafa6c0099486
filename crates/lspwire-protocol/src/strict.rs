//! Strict decoding on top of `serde_json::Value`.
//!
//! [`StrictDecode`] is the decoding contract used by every protocol value.
//! Object shapes describe their keys once with a [`FieldSet`]; decoding then
//! runs three explicit steps:
//!
//! 1. every required key must be present in the raw object,
//! 2. no key outside the declared set may appear,
//! 3. each field value is decoded strictly in turn.
//!
//! A required field typed `Option<T>` must be present but may be `null`.
//! An optional field may be absent or `null`.
//!
//! ```
//! use lspwire_protocol::strict::{decode, StrictDecode};
//! use lspwire_protocol::catalog::Position;
//! use serde_json::json;
//!
//! let pos: Position = decode(&json!({"line": 3, "character": 7})).unwrap();
//! assert_eq!(pos.line, 3);
//! assert!(decode::<Position>(&json!({"line": 3})).is_err());
//! assert!(decode::<Position>(&json!({"line": 3, "character": 7, "col": 1})).is_err());
//! ```

use crate::error::DecodeError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A value that can be decoded from JSON with full required/unknown-field checks.
pub trait StrictDecode: Sized {
    /// Name of the shape, used in error messages and union diagnostics.
    fn shape_name() -> String;

    /// Decodes `value` into `Self`, rejecting anything that does not fit exactly.
    fn decode_strict(value: &Value) -> Result<Self, DecodeError>;
}

/// Decodes a JSON value strictly.
pub fn decode<T: StrictDecode>(value: &Value) -> Result<T, DecodeError> {
    T::decode_strict(value)
}

/// Parses and strictly decodes JSON bytes.
pub fn from_slice<T: StrictDecode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    T::decode_strict(&value)
}

/// Parses and strictly decodes a JSON string.
pub fn from_str<T: StrictDecode>(text: &str) -> Result<T, DecodeError> {
    from_slice(text.as_bytes())
}

/// Serde entry point for types whose `Deserialize` goes through [`StrictDecode`].
pub fn deserialize_strict<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: StrictDecode,
{
    let value = Value::deserialize(deserializer)?;
    T::decode_strict(&value).map_err(serde::de::Error::custom)
}

/// The declared keys of an object shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    shape: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

impl FieldSet {
    /// Creates a field set for `shape`.
    pub const fn new(
        shape: &'static str,
        required: &'static [&'static str],
        optional: &'static [&'static str],
    ) -> Self {
        Self {
            shape,
            required,
            optional,
        }
    }

    /// Name of the shape.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// Keys that must be present.
    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }

    /// Keys that may be present.
    pub fn optional(&self) -> &'static [&'static str] {
        self.optional
    }

    /// Returns true if `key` is one of the declared keys.
    pub fn declares(&self, key: &str) -> bool {
        self.required.contains(&key) || self.optional.contains(&key)
    }

    /// Checks that every required key is present.
    ///
    /// Presence is checked against the raw keys, so a required key whose value
    /// is `null` still counts as present.
    pub fn check_required(&self, object: &Map<String, Value>) -> Result<(), DecodeError> {
        for name in self.required {
            if !object.contains_key(*name) {
                return Err(DecodeError::MissingRequiredField {
                    shape: self.shape.to_string(),
                    field: (*name).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Rejects keys that are not declared.
    pub fn check_unrecognized(&self, object: &Map<String, Value>) -> Result<(), DecodeError> {
        for key in object.keys() {
            if !self.declares(key) {
                return Err(DecodeError::UnrecognizedField {
                    shape: self.shape.to_string(),
                    field: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Runs the object, presence, and unknown-field checks.
    pub fn check<'v>(&self, value: &'v Value) -> Result<ObjectView<'v>, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(self.shape, value))?;
        self.check_required(object)?;
        self.check_unrecognized(object)?;
        Ok(ObjectView {
            shape: self.shape,
            object,
        })
    }
}

/// A checked object whose fields can be decoded one by one.
#[derive(Debug, Clone, Copy)]
pub struct ObjectView<'v> {
    shape: &'static str,
    object: &'v Map<String, Value>,
}

impl<'v> ObjectView<'v> {
    /// Decodes a required field.
    pub fn required<T: StrictDecode>(&self, field: &str) -> Result<T, DecodeError> {
        let value = self
            .object
            .get(field)
            .ok_or_else(|| DecodeError::MissingRequiredField {
                shape: self.shape.to_string(),
                field: field.to_string(),
            })?;
        T::decode_strict(value).map_err(|e| e.in_field(self.shape, field))
    }

    /// Decodes an optional field. Absent and `null` both yield `None`.
    pub fn optional<T: StrictDecode>(&self, field: &str) -> Result<Option<T>, DecodeError> {
        match self.object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::decode_strict(value)
                .map(Some)
                .map_err(|e| e.in_field(self.shape, field)),
        }
    }

    /// The raw value of a field, if present.
    pub fn raw(&self, field: &str) -> Option<&'v Value> {
        self.object.get(field)
    }
}

/// Implements [`StrictDecode`] and `Deserialize` for a struct from its field list.
///
/// Field identifiers map to wire names; the struct's field types drive decoding.
macro_rules! strict_struct {
    (
        $ty:ident {
            required { $( $req:ident : $req_name:literal ),* $(,)? }
            optional { $( $opt:ident : $opt_name:literal ),* $(,)? }
        }
    ) => {
        impl $ty {
            /// Declared wire keys of this shape.
            pub const FIELDS: $crate::strict::FieldSet = $crate::strict::FieldSet::new(
                stringify!($ty),
                &[$($req_name),*],
                &[$($opt_name),*],
            );
        }

        impl $crate::strict::StrictDecode for $ty {
            fn shape_name() -> String {
                stringify!($ty).to_string()
            }

            #[allow(unused_variables)]
            fn decode_strict(
                value: &serde_json::Value,
            ) -> Result<Self, $crate::error::DecodeError> {
                let object = Self::FIELDS.check(value)?;
                Ok(Self {
                    $( $req: object.required($req_name)?, )*
                    $( $opt: object.optional($opt_name)?, )*
                })
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                $crate::strict::deserialize_strict(deserializer)
            }
        }
    };
}

pub(crate) use strict_struct;

// ============================================================================
// Primitive shapes
// ============================================================================

impl StrictDecode for String {
    fn shape_name() -> String {
        "string".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecodeError::type_mismatch("string", value))
    }
}

impl StrictDecode for bool {
    fn shape_name() -> String {
        "boolean".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch("boolean", value))
    }
}

impl StrictDecode for i32 {
    fn shape_name() -> String {
        "integer".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let n = value
            .as_i64()
            .ok_or_else(|| DecodeError::type_mismatch("integer", value))?;
        i32::try_from(n).map_err(|_| DecodeError::TypeMismatch {
            expected: "integer".to_string(),
            found: format!("{n} (out of range)"),
        })
    }
}

impl StrictDecode for u32 {
    fn shape_name() -> String {
        "uinteger".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let n = value
            .as_u64()
            .ok_or_else(|| DecodeError::type_mismatch("uinteger", value))?;
        u32::try_from(n).map_err(|_| DecodeError::TypeMismatch {
            expected: "uinteger".to_string(),
            found: format!("{n} (out of range)"),
        })
    }
}

impl StrictDecode for f64 {
    fn shape_name() -> String {
        "decimal".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch("decimal", value))
    }
}

/// The wire `null`, used as the params of parameterless methods and the
/// result of void requests.
impl StrictDecode for () {
    fn shape_name() -> String {
        "null".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        if value.is_null() {
            Ok(())
        } else {
            Err(DecodeError::type_mismatch("null", value))
        }
    }
}

impl StrictDecode for Value {
    fn shape_name() -> String {
        "LSPAny".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl StrictDecode for Map<String, Value> {
    fn shape_name() -> String {
        "LSPObject".to_string()
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| DecodeError::type_mismatch("LSPObject", value))
    }
}

impl<T: StrictDecode> StrictDecode for Vec<T> {
    fn shape_name() -> String {
        format!("{}[]", T::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let items = value
            .as_array()
            .ok_or_else(|| DecodeError::type_mismatch(Self::shape_name(), value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode_strict(item).map_err(|e| e.at_index(i)))
            .collect()
    }
}

impl<T: StrictDecode> StrictDecode for Option<T> {
    fn shape_name() -> String {
        format!("{} | null", T::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::decode_strict(value).map(Some)
        }
    }
}

impl<T: StrictDecode> StrictDecode for HashMap<String, T> {
    fn shape_name() -> String {
        format!("map<string, {}>", T::shape_name())
    }

    fn decode_strict(value: &Value) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(Self::shape_name(), value))?;
        object
            .iter()
            .map(|(key, item)| {
                T::decode_strict(item)
                    .map(|decoded| (key.clone(), decoded))
                    .map_err(|e| e.in_field("map", key))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct ShapeX {
        a: i32,
    }

    strict_struct!(ShapeX {
        required { a: "a" }
        optional {}
    });

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct ShapeY {
        a: i32,
        b: i32,
        c: i32,
    }

    strict_struct!(ShapeY {
        required { a: "a", b: "b", c: "c" }
        optional {}
    });

    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Workspace {
        process_id: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        root_path: Option<String>,
    }

    strict_struct!(Workspace {
        required { process_id: "processId" }
        optional { root_path: "rootPath" }
    });

    #[test]
    fn extra_field_is_rejected() {
        let err = decode::<ShapeX>(&json!({"a": 1, "b": 2})).unwrap_err();
        match err {
            DecodeError::UnrecognizedField { shape, field } => {
                assert_eq!(shape, "ShapeX");
                assert_eq!(field, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_field_is_named() {
        let err = decode::<ShapeY>(&json!({"a": 1, "b": 2})).unwrap_err();
        match err {
            DecodeError::MissingRequiredField { shape, field } => {
                assert_eq!(shape, "ShapeY");
                assert_eq!(field, "c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn required_check_runs_before_unknown_check() {
        let err = decode::<ShapeY>(&json!({"a": 1, "z": 2})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredField { .. }));
    }

    #[test]
    fn required_nullable_must_be_present() {
        let ok: Workspace = decode(&json!({"processId": null})).unwrap();
        assert_eq!(ok.process_id, None);

        let err = decode::<Workspace>(&json!({})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredField { .. }));
    }

    #[test]
    fn optional_accepts_absent_or_null() {
        let a: Workspace = decode(&json!({"processId": 1})).unwrap();
        let b: Workspace = decode(&json!({"processId": 1, "rootPath": null})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.root_path, None);

        let c: Workspace = decode(&json!({"processId": 1, "rootPath": "/tmp"})).unwrap();
        assert_eq!(c.root_path.as_deref(), Some("/tmp"));
    }

    #[test]
    fn field_type_errors_carry_path() {
        let err = decode::<Workspace>(&json!({"processId": "one"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Workspace.processId: expected integer, found string"
        );
    }

    #[test]
    fn serde_deserialize_goes_through_strict_path() {
        let result: Result<ShapeX, _> = serde_json::from_str(r#"{"a": 1, "b": 2}"#);
        assert!(result.is_err());
        let ok: ShapeX = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert_eq!(ok, ShapeX { a: 1 });
    }

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(decode::<i32>(&json!(-5)).unwrap(), -5);
        assert!(decode::<i32>(&json!(1.5)).is_err());
        assert!(decode::<i32>(&json!(4_294_967_296_i64)).is_err());
        assert!(decode::<u32>(&json!(-1)).is_err());
        assert_eq!(decode::<u32>(&json!(4_294_967_295_u32)).unwrap(), u32::MAX);
        assert!((decode::<f64>(&json!(2)).unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn arrays_report_element_index() {
        let err = decode::<Vec<ShapeX>>(&json!([{"a": 1}, {"a": "x"}])).unwrap_err();
        assert!(matches!(err, DecodeError::Index { index: 1, .. }));
    }

    #[test]
    fn null_shape() {
        assert!(decode::<()>(&Value::Null).is_ok());
        assert!(decode::<()>(&json!({})).is_err());
    }

    #[test]
    fn maps_decode_values() {
        let map: HashMap<String, i32> = decode(&json!({"x": 1, "y": 2})).unwrap();
        assert_eq!(map["y"], 2);
        assert!(decode::<HashMap<String, i32>>(&json!({"x": true})).is_err());
    }

    #[test]
    fn shape_names() {
        assert_eq!(Vec::<ShapeX>::shape_name(), "ShapeX[]");
        assert_eq!(Option::<String>::shape_name(), "string | null");
        assert_eq!(ShapeY::FIELDS.required(), &["a", "b", "c"]);
    }
}
