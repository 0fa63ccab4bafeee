//! Field values, wire serialization, and dirty-field bookkeeping.
//!
//! Every update payload sent to the server is a flat map of string
//! key/value pairs regardless of semantic type, so each [`FieldValue`]
//! knows how to render itself in the server's text dialect.

use chrono::NaiveDateTime;
use indexmap::IndexSet;

use crate::error::Error;

/// Wire format for date/time fields, e.g. `2024-06-15 10:30:00.000`.
pub const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Semantic kind of a resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Bool,
    DateTime,
}

/// A typed field value staged for transmission.
///
/// Conversion helpers return `InvalidArgument` on a kind mismatch so a
/// caller passing the wrong type to `set_field` fails before any network
/// traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::Str,
            Self::Int(_) => FieldKind::Int,
            Self::Bool(_) => FieldKind::Bool,
            Self::DateTime(_) => FieldKind::DateTime,
        }
    }

    /// Render this value in the server's string dialect: booleans as
    /// `"true"`/`"false"`, integers as decimal text, date/times in
    /// [`DATETIME_WIRE_FORMAT`].
    pub fn to_wire(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => if *b { "true" } else { "false" }.to_owned(),
            Self::DateTime(dt) => dt.format(DATETIME_WIRE_FORMAT).to_string(),
        }
    }

    pub fn into_str(self) -> Result<String, Error> {
        match self {
            Self::Str(s) => Ok(s),
            other => Err(kind_mismatch(FieldKind::Str, other.kind())),
        }
    }

    pub fn into_int(self) -> Result<i64, Error> {
        match self {
            Self::Int(n) => Ok(n),
            other => Err(kind_mismatch(FieldKind::Int, other.kind())),
        }
    }

    pub fn into_bool(self) -> Result<bool, Error> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(kind_mismatch(FieldKind::Bool, other.kind())),
        }
    }

    pub fn into_datetime(self) -> Result<NaiveDateTime, Error> {
        match self {
            Self::DateTime(dt) => Ok(dt),
            other => Err(kind_mismatch(FieldKind::DateTime, other.kind())),
        }
    }
}

fn kind_mismatch(expected: FieldKind, got: FieldKind) -> Error {
    Error::invalid_argument(format!("expected {expected:?} value, got {got:?}"))
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

// ── Change tracker ───────────────────────────────────────────────────

/// Records which named fields have been modified locally since the last
/// successful sync with the server.
///
/// Pure bookkeeping -- no operation here can fail, and field names are
/// not validated against any schema. Insertion order is preserved so
/// update payloads are deterministic.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    dirty: IndexSet<&'static str>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self, field: &'static str) {
        self.dirty.insert(field);
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// Dirty field names in the order they were first marked.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.iter().copied()
    }

    /// Empties the dirty set. Called after a successful push, or when the
    /// caller discards staged edits.
    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wire_format_bool() {
        assert_eq!(FieldValue::Bool(true).to_wire(), "true");
        assert_eq!(FieldValue::Bool(false).to_wire(), "false");
    }

    #[test]
    fn wire_format_int() {
        assert_eq!(FieldValue::Int(42).to_wire(), "42");
        assert_eq!(FieldValue::Int(-7).to_wire(), "-7");
    }

    #[test]
    fn wire_format_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|d| d.and_hms_milli_opt(10, 30, 0, 0))
            .expect("valid timestamp");
        assert_eq!(FieldValue::DateTime(dt).to_wire(), "2024-06-15 10:30:00.000");
    }

    #[test]
    fn kind_mismatch_is_invalid_argument() {
        let err = FieldValue::Bool(true).into_str().unwrap_err();
        assert!(err.is_local(), "mismatch must be a local error: {err:?}");
    }

    #[test]
    fn tracker_marks_and_clears() {
        let mut tracker = ChangeTracker::new();
        assert!(tracker.is_empty());

        tracker.mark_dirty("DisplayName");
        tracker.mark_dirty("Alias");
        tracker.mark_dirty("DisplayName"); // re-mark is a no-op

        assert!(tracker.is_dirty("DisplayName"));
        assert!(!tracker.is_dirty("FirstName"));
        assert_eq!(tracker.len(), 2);
        assert_eq!(
            tracker.dirty_fields().collect::<Vec<_>>(),
            vec!["DisplayName", "Alias"]
        );

        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.is_dirty("DisplayName"));
    }
}
