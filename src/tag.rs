//! Tag representations and the color palette.
//!
//! Tags are stored on each note exactly as they were written: either a bare
//! label or a `{label, color}` pair. Anything else found at rest is kept
//! verbatim so a load/save cycle never destroys data, but it normalizes to
//! nothing and is never displayed.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::note::truthy;

/// Identifier of one of the fixed tag colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorId {
    Blue,
    Green,
    Amber,
    Rose,
    Violet,
}

impl ColorId {
    /// Every color, in palette order.
    pub const ALL: [ColorId; 5] = [
        ColorId::Blue,
        ColorId::Green,
        ColorId::Amber,
        ColorId::Rose,
        ColorId::Violet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorId::Blue => "blue",
            ColorId::Green => "green",
            ColorId::Amber => "amber",
            ColorId::Rose => "rose",
            ColorId::Violet => "violet",
        }
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color assigned to tags that carry no color of their own.
pub const DEFAULT_COLOR: ColorId = ColorId::Blue;

/// Background/foreground pair used to render a tag chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagColor {
    pub id: ColorId,
    pub background: &'static str,
    pub foreground: &'static str,
}

/// The palette. Both colors of every entry work on light and dark themes.
pub const TAG_COLORS: [TagColor; 5] = [
    TagColor {
        id: ColorId::Blue,
        background: "rgba(59, 130, 246, 0.2)",
        foreground: "#2563eb",
    },
    TagColor {
        id: ColorId::Green,
        background: "rgba(34, 197, 94, 0.2)",
        foreground: "#15803d",
    },
    TagColor {
        id: ColorId::Amber,
        background: "rgba(245, 158, 11, 0.2)",
        foreground: "#b45309",
    },
    TagColor {
        id: ColorId::Rose,
        background: "rgba(244, 63, 94, 0.2)",
        foreground: "#be123c",
    },
    TagColor {
        id: ColorId::Violet,
        background: "rgba(139, 92, 246, 0.2)",
        foreground: "#6d28d9",
    },
];

/// Resolves a stored color id to its palette entry.
///
/// Unknown ids fall back to the first palette entry instead of failing, so a
/// tag written with a color this build doesn't know still renders.
pub fn resolve_color(color_id: &str) -> &'static TagColor {
    TAG_COLORS
        .iter()
        .find(|c| c.id.as_str() == color_id)
        .unwrap_or(&TAG_COLORS[0])
}

/// A tag as it is stored on a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    /// A bare label, e.g. `"work"`.
    Label(String),
    /// A label with a color, e.g. `{"label": "work", "color": "rose"}`. The
    /// color is kept in whatever shape it was stored.
    Labeled {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Value>,
    },
    /// Any other value found at rest (null, numbers, objects without a label).
    Invalid(Value),
}

impl RawTag {
    pub fn label(label: impl Into<String>) -> Self {
        RawTag::Label(label.into())
    }

    pub fn labeled(label: impl Into<String>, color: ColorId) -> Self {
        RawTag::Labeled {
            label: label.into(),
            color: Some(color.as_str().into()),
        }
    }
}

/// A tag in canonical form. `color` is the stored id, not yet validated
/// against the palette; see [`resolve_color`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTag {
    pub label: String,
    pub color: String,
}

impl NormalizedTag {
    pub fn palette_color(&self) -> &'static TagColor {
        resolve_color(&self.color)
    }
}

/// Converts a stored tag to canonical form, or `None` when it is not a
/// displayable tag.
pub fn normalize(tag: &RawTag) -> Option<NormalizedTag> {
    match tag {
        RawTag::Label(label) => Some(NormalizedTag {
            label: label.clone(),
            color: DEFAULT_COLOR.as_str().to_string(),
        }),
        RawTag::Labeled { label, color } if !label.is_empty() => Some(NormalizedTag {
            label: label.clone(),
            color: color_id(color.as_ref()),
        }),
        RawTag::Labeled { .. } | RawTag::Invalid(_) => None,
    }
}

/// The color id a stored color stands for. Falsy colors take the default;
/// other non-string colors keep their JSON text and resolve to the fallback.
fn color_id(color: Option<&Value>) -> String {
    match color {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(other) if truthy(other) => other.to_string(),
        _ => DEFAULT_COLOR.as_str().to_string(),
    }
}

/// Normalizes a tag list, dropping entries that don't normalize.
pub fn normalize_all(tags: &[RawTag]) -> Vec<NormalizedTag> {
    tags.iter().filter_map(normalize).collect()
}

/// Parses one tag given on the command line: `label` or `label:color`.
pub fn parse_tag_arg(arg: &str) -> RawTag {
    match arg.split_once(':') {
        Some((label, color)) if !color.trim().is_empty() => RawTag::Labeled {
            label: label.trim().to_string(),
            color: Some(color.trim().to_lowercase().into()),
        },
        Some((label, _)) => RawTag::Label(label.trim().to_string()),
        None => RawTag::Label(arg.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_label_gets_default_color() {
        let tag = normalize(&RawTag::label("food")).unwrap();
        assert_eq!(tag.label, "food");
        assert_eq!(tag.color, "blue");
    }

    #[test]
    fn test_labeled_keeps_unvalidated_color() {
        let tag = RawTag::Labeled {
            label: "work".into(),
            color: Some("chartreuse".into()),
        };
        let normalized = normalize(&tag).unwrap();
        assert_eq!(normalized.color, "chartreuse");
        assert_eq!(normalized.palette_color().id, ColorId::Blue);
    }

    #[test]
    fn test_labeled_without_color_falls_back() {
        let missing = RawTag::Labeled {
            label: "a".into(),
            color: None,
        };
        let empty = RawTag::Labeled {
            label: "a".into(),
            color: Some("".into()),
        };
        assert_eq!(normalize(&missing).unwrap().color, "blue");
        assert_eq!(normalize(&empty).unwrap().color, "blue");
    }

    #[test]
    fn test_non_string_color_still_normalizes() {
        let tags: Vec<RawTag> = serde_json::from_value(json!([
            {"label": "work", "color": 3},
            {"label": "home", "color": false},
            {"label": "misc", "color": null}
        ]))
        .unwrap();
        assert!(tags.iter().all(|t| matches!(t, RawTag::Labeled { .. })));

        let normalized = normalize_all(&tags);
        let labels: Vec<&str> = normalized.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["work", "home", "misc"]);
        assert_eq!(normalized[0].palette_color().id, ColorId::Blue);
        assert_eq!(normalized[1].color, "blue");

        let saved = serde_json::to_value(&tags[0]).unwrap();
        assert_eq!(saved, json!({"label": "work", "color": 3}));
    }

    #[test]
    fn test_invalid_shapes_are_dropped() {
        let tags: Vec<RawTag> =
            serde_json::from_value(json!([null, 42, {"color": "rose"}, {"label": ""}, {"label": 7}, "ok"]))
                .unwrap();
        assert!(matches!(tags[0], RawTag::Invalid(_)));
        assert!(matches!(tags[4], RawTag::Invalid(_)));

        let normalized = normalize_all(&tags);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].label, "ok");
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let tags: Vec<RawTag> =
            serde_json::from_value(json!(["plain", {"label": "pair", "color": "green"}])).unwrap();
        assert_eq!(tags[0], RawTag::label("plain"));
        assert_eq!(tags[1], RawTag::labeled("pair", ColorId::Green));
    }

    #[test]
    fn test_invalid_tags_survive_serialization() {
        let tags = vec![RawTag::Invalid(json!({"colour": "red"})), RawTag::label("x")];
        let text = serde_json::to_string(&tags).unwrap();
        assert_eq!(text, r#"[{"colour":"red"},"x"]"#);
    }

    #[test]
    fn test_resolve_color() {
        for color in ColorId::ALL {
            assert_eq!(resolve_color(color.as_str()).id, color);
        }
        assert_eq!(resolve_color("nope"), &TAG_COLORS[0]);
        assert_eq!(resolve_color("").foreground, "#2563eb");
        assert_eq!(resolve_color("rose").background, "rgba(244, 63, 94, 0.2)");
    }

    #[test]
    fn test_parse_tag_arg() {
        assert_eq!(parse_tag_arg("food"), RawTag::label("food"));
        assert_eq!(parse_tag_arg(" work : Rose "), RawTag::labeled("work", ColorId::Rose));
        assert_eq!(parse_tag_arg("todo:"), RawTag::label("todo"));
    }
}
