//! The note record and the draft the editor hands over for creation.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{normalize_all, NormalizedTag, RawTag};

/// Number of content characters shown when a note has no snippet.
pub const PREVIEW_LENGTH: usize = 120;

/// Title shown for notes whose title is empty.
pub const UNTITLED_TITLE: &str = "Untitled Note";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    /// Note title, possibly empty
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Plain-text body
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    /// Precomputed preview, preferred over the content prefix when present
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub snippet: Option<String>,
    /// Tags in their stored shape
    #[serde(default, deserialize_with = "lenient::tags")]
    pub tags: Vec<RawTag>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_pinned: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_favorite: bool,
    /// Soft-delete flag; the note lives in the trash while set
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_deleted: bool,
    /// Last modification time
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::timestamp"
    )]
    pub updated_at: Option<Timestamp>,
    /// When the note was moved to the trash. Present only while `is_deleted`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::timestamp"
    )]
    pub deleted_at: Option<Timestamp>,
}

/// A stored point in time. Values that don't parse as one are kept as found,
/// so saving writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    At(DateTime<Utc>),
    Unparsed(Value),
}

impl Timestamp {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(at) => Some(*at),
            Timestamp::Unparsed(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Timestamp::At(at)
    }
}

/// Note fields produced by the editor for a new note. The store assigns the
/// id and timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub snippet: Option<String>,
    pub tags: Vec<RawTag>,
    pub is_pinned: bool,
    pub is_favorite: bool,
}

impl Note {
    /// Creates a new note from a draft, with a fresh id and `updated_at` set to `now`.
    pub fn new(draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Note {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            snippet: draft.snippet,
            tags: draft.tags,
            is_pinned: draft.is_pinned,
            is_favorite: draft.is_favorite,
            is_deleted: false,
            updated_at: Some(Timestamp::At(now)),
            deleted_at: None,
        }
    }

    /// The title to show, substituting a placeholder for an empty one.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_TITLE
        } else {
            &self.title
        }
    }

    /// The snippet if it is set and non-empty, otherwise the first
    /// [`PREVIEW_LENGTH`] characters of the content.
    pub fn preview(&self) -> String {
        match self.snippet.as_deref() {
            Some(snippet) if !snippet.is_empty() => snippet.to_string(),
            _ => self.content.chars().take(PREVIEW_LENGTH).collect(),
        }
    }

    /// Last modification time, if one is stored and readable.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_ref().and_then(Timestamp::instant)
    }

    /// Time the note went to the trash, if one is stored and readable.
    pub fn deleted(&self) -> Option<DateTime<Utc>> {
        self.deleted_at.as_ref().and_then(Timestamp::instant)
    }

    /// Tags in canonical form, with invalid entries dropped.
    pub fn normalized_tags(&self) -> Vec<NormalizedTag> {
        normalize_all(&self.tags)
    }
}

/// Field decoders that accept the loosely-typed records older clients wrote.
///
/// Apart from `id`, every decoder here is total: any JSON value maps to
/// something, so a record is only ever rejected for lacking a usable id.
mod lenient {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de::Error, Deserialize, Deserializer};
    use serde_json::Value;

    use super::Timestamp;
    use crate::RawTag;

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(id),
            Value::Number(id) => Ok(id.to_string()),
            Value::Bool(id) => Ok(id.to_string()),
            other => Err(D::Error::custom(format!("unusable note id {}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(deserializer)?))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(truthy(&Value::deserialize(deserializer)?))
    }

    pub fn tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawTag>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item.clone()).unwrap_or(RawTag::Invalid(item))
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Null => return Ok(None),
            Value::String(text) => parse_timestamp(text),
            Value::Number(millis) => millis
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        };
        Ok(Some(match parsed {
            Some(at) => Timestamp::At(at),
            None => Timestamp::Unparsed(value),
        }))
    }

    /// RFC 3339, or a bare `YYYY-MM-DD` date taken as midnight UTC.
    pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Text for a loosely-typed field: strings as-is, scalars and
    /// structures in their JSON form, null as nothing.
    fn text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }

    /// Flags follow the truthiness older clients applied to them.
    pub fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

pub use lenient::parse_timestamp;
pub(crate) use lenient::truthy;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_note_from_draft() {
        let now = Utc::now();
        let draft = NoteDraft {
            title: "Grocery list".into(),
            content: "milk, eggs".into(),
            tags: vec![RawTag::label("food")],
            is_favorite: true,
            ..Default::default()
        };

        let note = Note::new(draft, now);
        assert!(!note.id.is_empty());
        assert_eq!(note.updated(), Some(now));
        assert!(note.is_favorite);
        assert!(!note.is_deleted);
        assert!(note.deleted_at.is_none());

        let other = Note::new(NoteDraft::default(), now);
        assert_ne!(note.id, other.id);
    }

    #[test]
    fn test_display_title_placeholder() {
        let mut note = Note::new(NoteDraft::default(), Utc::now());
        assert_eq!(note.display_title(), "Untitled Note");
        assert!(note.title.is_empty());
        note.title = "Plans".into();
        assert_eq!(note.display_title(), "Plans");
    }

    #[test]
    fn test_preview_prefers_snippet() {
        let mut note = Note::new(
            NoteDraft {
                content: "é".repeat(200),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(note.preview().chars().count(), PREVIEW_LENGTH);

        note.snippet = Some(String::new());
        assert_eq!(note.preview().chars().count(), PREVIEW_LENGTH);

        note.snippet = Some("summary".into());
        assert_eq!(note.preview(), "summary");
    }

    #[test]
    fn test_serialized_field_names() {
        let mut note = Note::new(NoteDraft::default(), Utc::now());
        note.is_deleted = true;
        note.deleted_at = note.updated_at.clone();
        let value = serde_json::to_value(&note).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            "id", "title", "content", "tags", "isPinned", "isFavorite", "isDeleted", "updatedAt",
            "deletedAt",
        ] {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert!(!object.contains_key("snippet"));
    }

    #[test]
    fn test_absent_deleted_at_is_not_written() {
        let note = Note::new(NoteDraft::default(), Utc::now());
        let text = serde_json::to_string(&note).unwrap();
        assert!(!text.contains("deletedAt"));
    }

    #[test]
    fn test_lenient_decoding() {
        let note: Note = serde_json::from_value(json!({
            "id": 1,
            "title": null,
            "tags": "not-a-list",
            "isPinned": null,
            "updatedAt": "2024-01-01",
            "deletedAt": "yesterday"
        }))
        .unwrap();

        assert_eq!(note.id, "1");
        assert_eq!(note.title, "");
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned);
        assert_eq!(
            note.updated().unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert!(note.deleted().is_none());
    }

    #[test]
    fn test_loose_field_types_still_decode() {
        let note: Note = serde_json::from_value(json!({
            "id": "b",
            "title": 42,
            "content": ["a", "b"],
            "snippet": false,
            "isFavorite": "yes",
            "isPinned": 0,
            "isDeleted": {}
        }))
        .unwrap();

        assert_eq!(note.title, "42");
        assert_eq!(note.content, r#"["a","b"]"#);
        assert_eq!(note.snippet.as_deref(), Some("false"));
        assert!(note.is_favorite);
        assert!(!note.is_pinned);
        assert!(note.is_deleted);
    }

    #[test]
    fn test_unreadable_timestamps_are_kept_verbatim() {
        let note: Note = serde_json::from_value(json!({
            "id": "t",
            "updatedAt": "yesterday",
            "deletedAt": {"day": 3}
        }))
        .unwrap();

        assert!(note.updated().is_none());
        assert_eq!(
            note.updated_at,
            Some(Timestamp::Unparsed(json!("yesterday")))
        );

        let saved = serde_json::to_value(&note).unwrap();
        assert_eq!(saved["updatedAt"], json!("yesterday"));
        assert_eq!(saved["deletedAt"], json!({"day": 3}));
    }

    #[test]
    fn test_millisecond_timestamps() {
        let note: Note =
            serde_json::from_value(json!({"id": "m", "updatedAt": 1_717_245_000_250_i64})).unwrap();
        assert_eq!(note.updated().unwrap().timestamp_millis(), 1_717_245_000_250);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_value::<Note>(json!({"title": "orphan"}));
        assert!(result.is_err());
        assert!(serde_json::from_value::<Note>(json!({"id": null})).is_err());
        assert!(serde_json::from_value::<Note>(json!({"id": {"n": 1}})).is_err());
    }

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp("2024-06-01T12:30:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_717_245_000_250);
        assert!(parse_timestamp("2024-13-01").is_none());
    }
}
