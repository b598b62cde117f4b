//! GELF record assembly

use super::context::FieldValue;
use super::flatten::FlatFields;
use super::log_level::SeverityLevel;
use super::metadata::format_seconds;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

pub const HOST: &str = "host";
pub const TIMESTAMP: &str = "timestamp";
pub const SHORT_MESSAGE: &str = "short_message";
pub const LEVEL: &str = "level";
pub const FULL_MESSAGE: &str = "message";

/// A finished GELF message
///
/// Holds every additional field followed by the four required ones. It is
/// built once per log call and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GelfRecord {
    fields: FlatFields,
}

impl GelfRecord {
    pub fn host(&self) -> Option<&str> {
        self.get(HOST).and_then(FieldValue::as_str)
    }

    /// `"<seconds>.<microseconds>"`
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP).and_then(FieldValue::as_str)
    }

    pub fn short_message(&self) -> Option<&str> {
        self.get(SHORT_MESSAGE).and_then(FieldValue::as_str)
    }

    /// Text after the first line break of a multi-line message
    pub fn full_message(&self) -> Option<&str> {
        self.get(FULL_MESSAGE).and_then(FieldValue::as_str)
    }

    pub fn level(&self) -> Option<SeverityLevel> {
        self.get(LEVEL).and_then(FieldValue::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn fields(&self) -> &FlatFields {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to a single-line JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for GelfRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Build the final record
///
/// A message containing a line break is split at the first one: the head
/// becomes `short_message`, the rest is stored verbatim under `message`.
/// `host`, `timestamp`, `short_message` and `level` always override fields
/// of the same name.
pub fn assemble(
    level: SeverityLevel,
    message: &str,
    mut fields: FlatFields,
    host: &str,
    now: &DateTime<Utc>,
) -> GelfRecord {
    let short_message = match message.split_once('\n') {
        Some((short, full)) => {
            fields.insert(FULL_MESSAGE, full);
            short
        }
        None => message,
    };

    fields.insert(HOST, host);
    fields.insert(TIMESTAMP, format_seconds(now));
    fields.insert(SHORT_MESSAGE, short_message);
    fields.insert(LEVEL, level);

    GelfRecord { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap()
    }

    #[test]
    fn test_single_line() {
        let record = assemble(7, "foobar", FlatFields::new(), "web-1", &now());

        assert_eq!(record.short_message(), Some("foobar"));
        assert_eq!(record.full_message(), None);
        assert_eq!(record.host(), Some("web-1"));
        assert_eq!(record.level(), Some(7));
        assert_eq!(record.timestamp(), Some("1700000000.123456"));
    }

    #[test]
    fn test_multi_line_split_on_first_break() {
        let record = assemble(7, "short\nlong1\nlong2", FlatFields::new(), "h", &now());

        assert_eq!(record.short_message(), Some("short"));
        assert_eq!(record.full_message(), Some("long1\nlong2"));
    }

    #[test]
    fn test_trailing_break_gives_empty_full_message() {
        let record = assemble(7, "only\n", FlatFields::new(), "h", &now());

        assert_eq!(record.short_message(), Some("only"));
        assert_eq!(record.full_message(), Some(""));
    }

    #[test]
    fn test_required_fields_override() {
        let mut fields = FlatFields::new();
        fields.insert("_extra", 1);
        fields.insert(HOST, "spoofed");
        fields.insert(LEVEL, "loud");

        let record = assemble(3, "msg", fields, "real-host", &now());

        assert_eq!(record.host(), Some("real-host"));
        assert_eq!(record.level(), Some(3));
        assert_eq!(record.get("_extra"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_json_layout() {
        let mut fields = FlatFields::new();
        fields.insert("_user", "alice");

        let record = assemble(6, "hello", fields, "h", &now());
        let json = record.to_json().unwrap();

        assert_eq!(
            json,
            r#"{"_user":"alice","host":"h","timestamp":"1700000000.123456","short_message":"hello","level":6}"#
        );
    }
}
