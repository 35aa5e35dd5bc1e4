use crate::{parse_tag_arg, RawTag};

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<RawTag> {
    tags.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_tag_arg)
            .collect()
    })
    .unwrap_or_default()
}

/// Strips the comment lines of the editor template.
pub fn process_editor_content(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            !line.trim_start().starts_with("<!--") && !line.trim_end().ends_with("-->")
        })
        .collect::<Vec<&str>>()
        .join("\n")
        .trim()
        .to_string()
}
