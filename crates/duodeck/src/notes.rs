//! Speaker notes.
//!
//! Notes live in a YAML file keyed by 1-based slide number:
//!
//! ```yaml
//! 1:
//!   target: "0:20"
//!   body: |
//!     Open with the headline numbers.
//! 2:
//!   target: "0:45"
//!   body: Walk through the problem.
//! ```
//!
//! The table is read once at startup and never changes afterwards.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const PLACEHOLDER_TARGET: &str = "N/A";
pub const PLACEHOLDER_BODY: &str = "No notes available for this slide.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerNote {
    pub slide_index: usize,
    /// Target speaking time, e.g. `1:10`.
    pub target: String,
    pub body: String,
}

impl SpeakerNote {
    pub fn placeholder(slide_index: usize) -> Self {
        Self {
            slide_index,
            target: PLACEHOLDER_TARGET.to_string(),
            body: PLACEHOLDER_BODY.to_string(),
        }
    }

    pub fn target_duration(&self) -> Option<Duration> {
        parse_target(&self.target)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteEntry {
    #[serde(default = "default_target")]
    target: String,
    #[serde(default)]
    body: String,
}

fn default_target() -> String {
    PLACEHOLDER_TARGET.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesTable {
    notes: BTreeMap<usize, SpeakerNote>,
}

impl NotesTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: impl IntoIterator<Item = SpeakerNote>) -> Self {
        Self {
            notes: notes.into_iter().map(|n| (n.slide_index, n)).collect(),
        }
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::empty());
        }
        let raw: BTreeMap<usize, NoteEntry> = serde_yaml::from_str(contents)?;
        Ok(Self::from_notes(raw.into_iter().map(|(slide_index, entry)| {
            SpeakerNote {
                slide_index,
                target: entry.target.trim().to_string(),
                body: entry.body.trim_end().to_string(),
            }
        })))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::NotesRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_yaml(&contents).map_err(|source| Error::NotesParse {
            path: path.to_path_buf(),
            source,
        })?;
        if table.notes.contains_key(&0) {
            return Err(Error::NotesZeroIndex);
        }
        info!(path = %path.display(), notes = table.len(), "loaded speaker notes");
        Ok(table)
    }

    /// Load `explicit` if given, else the `<stem>.notes.yaml` sibling of the
    /// deck if it exists, else an empty table.
    pub fn discover(deck_path: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let sibling = sibling_notes_path(deck_path);
        if sibling.is_file() {
            Self::load(&sibling)
        } else {
            debug!(path = %sibling.display(), "no notes file next to deck");
            Ok(Self::empty())
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, slide_index: usize) -> Option<&SpeakerNote> {
        self.notes.get(&slide_index)
    }

    /// The note for a slide, or the placeholder if none was written.
    pub fn lookup(&self, slide_index: usize) -> Cow<'_, SpeakerNote> {
        match self.notes.get(&slide_index) {
            Some(note) => Cow::Borrowed(note),
            None => Cow::Owned(SpeakerNote::placeholder(slide_index)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeakerNote> {
        self.notes.values()
    }

    /// Sum of every target label that parses.
    pub fn total_target(&self) -> Duration {
        self.iter().filter_map(SpeakerNote::target_duration).sum()
    }
}

pub fn sibling_notes_path(deck_path: &Path) -> PathBuf {
    let stem = deck_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    deck_path.with_file_name(format!("{stem}.notes.yaml"))
}

/// Parse a `M:SS` label. Minutes may have any number of digits, seconds
/// must be two digits below 60.
pub fn parse_target(label: &str) -> Option<Duration> {
    let (minutes, seconds) = label.trim().split_once(':')?;
    if seconds.len() != 2 {
        return None;
    }
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(Duration::from_secs(minutes * 60 + seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
1:
  target: "0:20"
  body: |
    Opening. State the headline numbers.
2:
  target: "1:10"
  body: Walk through the detection patterns.
4:
  body: No target for this one.
"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("duodeck_notes_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_parse_table() {
        let table = NotesTable::from_yaml(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        let first = table.get(1).unwrap();
        assert_eq!(first.target, "0:20");
        assert_eq!(first.body, "Opening. State the headline numbers.");
        assert_eq!(table.get(4).unwrap().target, PLACEHOLDER_TARGET);
    }

    #[test]
    fn test_lookup_falls_back_to_placeholder() {
        let table = NotesTable::from_yaml(SAMPLE).unwrap();
        assert!(matches!(table.lookup(2), Cow::Borrowed(_)));
        let missing = table.lookup(3);
        assert_eq!(missing.slide_index, 3);
        assert_eq!(missing.target, "N/A");
        assert_eq!(missing.body, PLACEHOLDER_BODY);
    }

    #[test]
    fn test_empty_file_is_empty_table() {
        assert!(NotesTable::from_yaml("").unwrap().is_empty());
        assert!(NotesTable::from_yaml("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_keys_rejected() {
        assert!(NotesTable::from_yaml("intro:\n  body: hi\n").is_err());
    }

    #[test]
    fn test_total_target_skips_unparseable() {
        let table = NotesTable::from_yaml(SAMPLE).unwrap();
        assert_eq!(table.total_target(), Duration::from_secs(90));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("0:20"), Some(Duration::from_secs(20)));
        assert_eq!(parse_target("10:30"), Some(Duration::from_secs(630)));
        assert_eq!(parse_target(" 1:05 "), Some(Duration::from_secs(65)));
        assert_eq!(parse_target("N/A"), None);
        assert_eq!(parse_target("1:5"), None);
        assert_eq!(parse_target("1:75"), None);
        assert_eq!(parse_target(":30"), None);
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_notes_path(Path::new("/talks/intro.md")),
            PathBuf::from("/talks/intro.notes.yaml")
        );
    }

    #[test]
    fn test_load_and_discover() {
        let deck = temp_path("talk.md");
        let sibling = sibling_notes_path(&deck);
        std::fs::write(&sibling, SAMPLE).unwrap();

        let table = NotesTable::discover(&deck, None).unwrap();
        assert_eq!(table.len(), 3);

        std::fs::remove_file(&sibling).unwrap();
        let table = NotesTable::discover(&deck, None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let deck = temp_path("other.md");
        let err = NotesTable::discover(&deck, Some(&temp_path("absent.yaml"))).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_slide_zero_rejected() {
        let path = temp_path("zero.notes.yaml");
        std::fs::write(&path, "0:\n  body: nope\n").unwrap();
        let err = NotesTable::load(&path).unwrap_err();
        assert!(matches!(err, Error::NotesZeroIndex));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let path = temp_path("broken.notes.yaml");
        std::fs::write(&path, "1: [unterminated\n").unwrap();
        let err = NotesTable::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.notes.yaml"));
        std::fs::remove_file(&path).unwrap();
    }
}
