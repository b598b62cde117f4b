//! Context flattening
//!
//! Nested maps and lists collapse into one level of `_`-prefixed,
//! lower-cased keys: `{a: {b: "x"}}` becomes `{_a_b: "x"}` and list
//! elements contribute their index (`_0_1`). Producers are run here, at
//! most once each, in iteration order.

use super::context::{Context, ContextValue, FieldValue};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Flat, insertion-ordered field mapping
///
/// Inserting a key that already exists replaces the value in place, so a
/// later write wins while the first position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFields {
    entries: Vec<(String, FieldValue)>,
}

impl FlatFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into `self`, `other` winning on collisions
    pub fn extend(&mut self, other: FlatFields) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl Serialize for FlatFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Flatten a context into `_`-prefixed fields
pub fn flatten(context: &Context) -> FlatFields {
    flatten_with_prefix(context.iter(), "")
}

/// Flatten key/value pairs, prepending `prefix` to every synthesized key
pub fn flatten_with_prefix<'a, I>(entries: I, prefix: &str) -> FlatFields
where
    I: IntoIterator<Item = (&'a str, &'a ContextValue)>,
{
    let mut output = FlatFields::new();

    for (key, value) in entries {
        let produced;
        let value = match value {
            ContextValue::Producer(producer) => {
                produced = producer.call();
                &produced
            }
            other => other,
        };

        let leaf = match value {
            ContextValue::Null => continue,
            ContextValue::Map(nested) => {
                output.extend(flatten_with_prefix(
                    nested.iter(),
                    &format!("{prefix}{key}_"),
                ));
                continue;
            }
            ContextValue::List(items) => {
                let indices: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
                output.extend(flatten_with_prefix(
                    indices.iter().map(String::as_str).zip(items.iter()),
                    &format!("{prefix}{key}_"),
                ));
                continue;
            }
            ContextValue::String(s) if s.is_empty() => continue,
            ContextValue::String(s) => FieldValue::String(s.clone()),
            ContextValue::Int(i) => FieldValue::Int(*i),
            ContextValue::Float(f) => FieldValue::Float(*f),
            ContextValue::Bool(b) => FieldValue::Bool(*b),
            // a producer that yields another producer has nothing to store
            ContextValue::Producer(_) => continue,
        };

        output.insert(field_name(prefix, key), leaf);
    }

    output
}

/// Lower-case `prefix + key` and make sure it starts with `_`
///
/// Only ASCII letters are folded; other characters are kept as given.
fn field_name(prefix: &str, key: &str) -> String {
    let name = format!("{prefix}{key}").to_ascii_lowercase();
    if name.starts_with('_') {
        name
    } else {
        format!("_{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_flat_context_is_prefixed_and_lowercased() {
        let ctx = Context::new()
            .with_field("Foo", "bar")
            .with_field("_already", 1)
            .with_field("flag", true);

        let fields = flatten(&ctx);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["_foo", "_already", "_flag"]);
        assert_eq!(fields.get("_foo"), Some(&FieldValue::from("bar")));
        assert_eq!(fields.get("_already"), Some(&FieldValue::Int(1)));
        assert_eq!(fields.get("_flag"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_non_ascii_keys_keep_their_case() {
        let ctx = Context::new()
            .with_field("Änderung", "x")
            .with_field("User", Context::new().with_field("Größe", 3));

        let fields = flatten(&ctx);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["_Änderung", "_user_größe"]);
    }

    #[test]
    fn test_nested_map() {
        let ctx = Context::new().with_field("a", Context::new().with_field("b", "x"));
        let fields = flatten(&ctx);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("_a_b"), Some(&FieldValue::from("x")));
    }

    #[test]
    fn test_nested_lists() {
        let ctx = Context::from_list(vec![vec!["foo", "bar"], vec!["baf", "baz"]]);
        let fields = flatten(&ctx);

        assert_eq!(fields.keys().collect::<Vec<_>>(), ["_0_0", "_0_1", "_1_0", "_1_1"]);
        assert_eq!(fields.get("_0_0"), Some(&FieldValue::from("foo")));
        assert_eq!(fields.get("_0_1"), Some(&FieldValue::from("bar")));
        assert_eq!(fields.get("_1_0"), Some(&FieldValue::from("baf")));
        assert_eq!(fields.get("_1_1"), Some(&FieldValue::from("baz")));
    }

    #[test]
    fn test_null_and_empty_are_dropped() {
        let ctx = Context::new()
            .with_field("null", ContextValue::Null)
            .with_field("empty", "")
            .with_field("nested", Context::new().with_field("gone", ContextValue::Null))
            .with_field("zero", 0)
            .with_field("no", false);

        let fields = flatten(&ctx);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["_zero", "_no"]);
    }

    #[test]
    fn test_producers_run_once_in_order() {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let first = Arc::clone(&log);
        let second = Arc::clone(&log);

        let ctx = Context::new()
            .with_field("b", ContextValue::producer(move || {
                first.lock().push("b");
                "one"
            }))
            .with_field("a", ContextValue::producer(move || {
                second.lock().push("a");
                "two"
            }));

        let fields = flatten(&ctx);
        assert_eq!(*log.lock(), ["b", "a"]);
        assert_eq!(fields.get("_b"), Some(&FieldValue::from("one")));
        assert_eq!(fields.get("_a"), Some(&FieldValue::from("two")));
    }

    #[test]
    fn test_producer_result_is_flattened() {
        let ctx = Context::new().with_field(
            "req",
            ContextValue::producer(|| Context::new().with_field("id", 7).with_field("skip", "")),
        );

        let fields = flatten(&ctx);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("_req_id"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn test_producer_returning_null_is_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let ctx = Context::new().with_field(
            "maybe",
            ContextValue::producer(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                ContextValue::Null
            }),
        );

        assert!(flatten(&ctx).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_collision_last_write_wins() {
        let ctx = Context::new()
            .with_field("a_b", "flat")
            .with_field("a", Context::new().with_field("b", "nested"));

        let fields = flatten(&ctx);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("_a_b"), Some(&FieldValue::from("nested")));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut fields = FlatFields::new();
        fields.insert("_z", 1);
        fields.insert("_a", "x");

        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"_z":1,"_a":"x"}"#);
    }
}
