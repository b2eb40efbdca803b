//! JSON-like response payloads that may contain lazy strings.

use crate::i18n::LazyString;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// A JSON-shaped value whose string leaves may still await translation.
///
/// Objects keep their entries in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Lazy(LazyString),
    Array(Vec<Payload>),
    Object(Vec<(String, Payload)>),
}

impl Payload {
    /// An empty object.
    pub fn object() -> Self {
        Payload::Object(Vec::new())
    }

    /// Insert `value` under `key`, replacing any existing entry in place.
    ///
    /// Returns the payload for chaining.
    ///
    /// # Panics
    /// In debug builds, when called on a non-object payload. Release builds
    /// leave a non-object payload unchanged.
    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Payload>) -> Self {
        debug_assert!(
            matches!(self, Payload::Object(_)),
            "Payload::insert called on a non-object payload: {:?}",
            self
        );
        if let Payload::Object(entries) = &mut self {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
        self
    }

    /// Look up an object entry by key.
    pub fn get(&self, key: &str) -> Option<&Payload> {
        match self {
            Payload::Object(entries) => entries
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Whether any leaf of this payload is a lazy string.
    pub fn contains_lazy(&self) -> bool {
        match self {
            Payload::Lazy(_) => true,
            Payload::Array(items) => items.iter().any(Payload::contains_lazy),
            Payload::Object(entries) => entries.iter().any(|(_, value)| value.contains_lazy()),
            _ => false,
        }
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Any lazy string still present is rendered as its raw template.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Null => Value::Null,
            Payload::Bool(b) => Value::Bool(b),
            Payload::Number(n) => Value::Number(n),
            Payload::String(s) => Value::String(s),
            Payload::Lazy(lazy) => Value::String(lazy.template().to_string()),
            Payload::Array(items) => Value::Array(items.into_iter().map(Payload::into_json).collect()),
            Payload::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Null => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Number(n) => n.serialize(serializer),
            Payload::String(s) => serializer.serialize_str(s),
            Payload::Lazy(lazy) => lazy.serialize(serializer),
            Payload::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Payload::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(b),
            Value::Number(n) => Payload::Number(n),
            Value::String(s) => Payload::String(s),
            Value::Array(items) => Payload::Array(items.into_iter().map(Payload::from).collect()),
            Value::Object(map) => Payload::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Payload::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<LazyString> for Payload {
    fn from(lazy: LazyString) -> Self {
        Payload::Lazy(lazy)
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Payload {
                fn from(n: $ty) -> Self {
                    Payload::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Payload {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Payload::Null, Payload::Number)
    }
}

impl From<f32> for Payload {
    fn from(f: f32) -> Self {
        Payload::from(f64::from(f))
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(items: Vec<T>) -> Self {
        Payload::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Null, Into::into)
    }
}

/// Builds an object; later duplicates of a key replace earlier ones.
impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<Payload>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Payload::object(), |object, (key, value)| object.insert(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::lazy_gettext;
    use serde_json::json;

    // ==================== Construction Tests ====================

    #[test]
    fn test_from_json_value_preserves_key_order() {
        let payload = Payload::from(json!({"z": 1, "a": 2, "m": 3}));
        match payload {
            Payload::Object(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let payload = Payload::object()
            .insert("a", 1)
            .insert("b", 2)
            .insert("a", "replaced");

        assert_eq!(payload.get("a"), Some(&Payload::from("replaced")));
        assert_eq!(payload.into_json(), json!({"a": "replaced", "b": 2}));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-object payload")]
    fn test_insert_on_non_object_panics_in_debug() {
        let _ = Payload::from(5).insert("a", 1);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_insert_on_non_object_is_noop_in_release() {
        let payload = Payload::from(5).insert("a", 1);
        assert_eq!(payload, Payload::from(5));
    }

    #[test]
    fn test_from_iterator_builds_object() {
        let payload: Payload = [("first", 1), ("second", 2)].into_iter().collect();
        assert_eq!(payload.into_json(), json!({"first": 1, "second": 2}));
    }

    #[test]
    fn test_from_option_and_vec() {
        assert_eq!(Payload::from(None::<i32>), Payload::Null);
        assert_eq!(
            Payload::from(vec![Some(1), None]).into_json(),
            json!([1, null])
        );
    }

    #[test]
    fn test_from_non_finite_float_is_null() {
        assert_eq!(Payload::from(f64::NAN), Payload::Null);
        assert_eq!(Payload::from(1.5).into_json(), json!(1.5));
    }

    // ==================== Lazy Detection Tests ====================

    #[test]
    fn test_contains_lazy_nested() {
        let payload = Payload::object().insert(
            "outer",
            vec![Payload::from(1), Payload::object().insert("deep", lazy_gettext("x"))],
        );
        assert!(payload.contains_lazy());
    }

    #[test]
    fn test_contains_lazy_plain_data() {
        let payload = Payload::from(json!({"a": [1, "two", {"b": null}]}));
        assert!(!payload.contains_lazy());
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_serialize_renders_lazy_as_template() {
        let payload = Payload::object()
            .insert("message", lazy_gettext("Hi {name}").with("name", "Ann"))
            .insert("count", 2);

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"message":"Hi {name}","count":2}"#);
    }

    #[test]
    fn test_serialize_matches_into_json() {
        let payload = Payload::from(json!({"a": [true, null, 1.25, "s"], "b": {}}));
        let via_serde = serde_json::to_value(&payload).unwrap();
        assert_eq!(via_serde, payload.into_json());
    }
}
