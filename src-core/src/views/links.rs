//! Auto-linking of note titles inside task descriptions

use regex::RegexBuilder;
use serde::Serialize;

use crate::domain::Note;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DescriptionSegment {
    Text { content: String },
    Link { note_id: String, text: String },
}

/// Split `description` into plain text and note links.
///
/// Titles of three characters or more match case-insensitively; longer
/// titles are matched first so they win over titles they contain.
pub fn link_notes(description: &str, notes: &[Note]) -> Vec<DescriptionSegment> {
    if description.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<&Note> = notes.iter().filter(|n| n.title.chars().count() > 2).collect();
    candidates.sort_by(|a, b| b.title.chars().count().cmp(&a.title.chars().count()));

    let mut parts = vec![DescriptionSegment::Text { content: description.to_string() }];
    for note in candidates {
        let re = match RegexBuilder::new(&regex::escape(&note.title)).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                log::warn!("Skipping note title '{}' for linking: {}", note.title, e);
                continue;
            }
        };

        let mut next = Vec::with_capacity(parts.len());
        for part in parts {
            let content = match part {
                DescriptionSegment::Text { content } => content,
                link => {
                    next.push(link);
                    continue;
                }
            };

            let mut last = 0;
            for m in re.find_iter(&content) {
                if m.start() > last {
                    next.push(DescriptionSegment::Text { content: content[last..m.start()].to_string() });
                }
                next.push(DescriptionSegment::Link { note_id: note.id.clone(), text: m.as_str().to_string() });
                last = m.end();
            }
            if last < content.len() {
                next.push(DescriptionSegment::Text { content: content[last..].to_string() });
            }
        }
        parts = next;
    }
    parts
}
