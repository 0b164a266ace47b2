//! View projection: pure derivations over the working set.
//!
//! No side effects anywhere in this module; the projection is recomputed
//! from scratch on every relevant state change.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use quill_core::Note;

/// Preview text length cap, in characters.
const PREVIEW_CHARS: usize = 120;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Which subset of the working set to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteFilter {
    #[default]
    All,
    Pinned,
}

/// Display card derived from a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCard {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub time_label: String,
    pub pinned: bool,
    pub tags: Vec<String>,
}

/// The projected list, partitioned for display.
///
/// An empty `pinned` group means the Pinned section is hidden entirely.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub pinned: Vec<NoteCard>,
    pub recent: Vec<NoteCard>,
    /// Count of all notes in the working set, before filtering.
    pub all_count: usize,
    /// Count of pinned notes in the working set, before filtering.
    pub pinned_count: usize,
}

/// Does a note survive the current search/filter/tag selection?
pub fn matches(note: &Note, query: &str, filter: NoteFilter, selected_tag: Option<&str>) -> bool {
    let query = query.to_lowercase();
    let matches_search = query.is_empty()
        || note.title.to_lowercase().contains(&query)
        || note.content.to_lowercase().contains(&query);
    let matches_filter = match filter {
        NoteFilter::All => true,
        NoteFilter::Pinned => note.pinned,
    };
    let matches_tag = match selected_tag {
        None => true,
        Some(tag) => note.tags.iter().any(|t| t == tag),
    };
    matches_search && matches_filter && matches_tag
}

/// Display order: pinned first, then `last_modified` descending, id
/// descending as the deterministic tie-break.
pub fn compare_display(a: &Note, b: &Note) -> std::cmp::Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then(b.last_modified.cmp(&a.last_modified))
        .then(b.id.cmp(&a.id))
}

/// Project the working set into display groups.
///
/// `now_millis` anchors the relative-time labels so the projection stays a
/// pure function of its inputs.
pub fn project(
    notes: &[Note],
    query: &str,
    filter: NoteFilter,
    selected_tag: Option<&str>,
    now_millis: i64,
) -> Projection {
    let mut filtered: Vec<&Note> = notes
        .iter()
        .filter(|n| matches(n, query, filter, selected_tag))
        .collect();
    filtered.sort_by(|a, b| compare_display(a, b));

    let mut projection = Projection {
        all_count: notes.len(),
        pinned_count: notes.iter().filter(|n| n.pinned).count(),
        ..Default::default()
    };

    for note in filtered {
        let card = NoteCard {
            id: note.id,
            title: if note.title.is_empty() {
                "Untitled".to_string()
            } else {
                note.title.clone()
            },
            preview: preview_text(&note.content),
            time_label: relative_time(note.last_modified, now_millis),
            pinned: note.pinned,
            tags: note.tags.clone(),
        };
        if note.pinned {
            projection.pinned.push(card);
        } else {
            projection.recent.push(card);
        }
    }
    projection
}

/// Strip rich-text markup down to plain preview text.
pub fn preview_text(content: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(content, " ");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ");
    collapsed.chars().take(PREVIEW_CHARS).collect()
}

/// Fixed-threshold relative time label.
///
/// <60s "Just now", <1h "{n}m ago", <24h "{n}h ago", otherwise the
/// absolute date.
pub fn relative_time(last_modified: i64, now_millis: i64) -> String {
    let diff = now_millis.saturating_sub(last_modified);
    if diff < 60_000 {
        "Just now".to_string()
    } else if diff < 3_600_000 {
        format!("{}m ago", diff / 60_000)
    } else if diff < 86_400_000 {
        format!("{}h ago", diff / 3_600_000)
    } else {
        chrono::DateTime::from_timestamp_millis(last_modified)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
