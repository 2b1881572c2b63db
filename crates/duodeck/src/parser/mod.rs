pub mod splitter;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use splitter::Fence;

#[derive(Debug, Clone)]
pub struct Deck {
    pub path: PathBuf,
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based position in the deck.
    pub number: usize,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Bullet { depth: usize, ordered: bool, text: String },
    Code { language: Option<String>, code: String },
    Rule,
}

impl Slide {
    /// Text of the first heading, if any.
    pub fn title(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Deck {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide count, fixed once the deck is loaded.
    pub fn total(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.slides.len())
    }

    /// Look up a slide by its 1-based number.
    pub fn slide(&self, number: usize) -> Option<&Slide> {
        number.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    pub fn display_title(&self) -> String {
        self.meta.title.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        })
    }
}

pub fn load(path: &Path) -> Result<Deck> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::DeckRead {
        path: path.to_path_buf(),
        source,
    })?;
    let deck = parse(&content, path);
    if deck.is_empty() {
        return Err(Error::EmptyDeck {
            path: path.to_path_buf(),
        });
    }
    info!(path = %path.display(), slides = deck.len(), "loaded deck");
    Ok(deck)
}

pub fn parse(content: &str, path: &Path) -> Deck {
    let (meta, body) = extract_frontmatter(content);
    let slides = splitter::split(body)
        .iter()
        .enumerate()
        .map(|(i, raw)| Slide {
            number: i + 1,
            blocks: parse_blocks(raw),
        })
        .collect();
    Deck {
        path: path.to_path_buf(),
        meta,
        slides,
    }
}

/// Pull a leading `---` YAML block off the document. Frontmatter that does
/// not parse is logged and ignored.
fn extract_frontmatter(content: &str) -> (DeckMeta, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (DeckMeta::default(), content);
    };
    let Some(end) = rest.find("\n---") else {
        return (DeckMeta::default(), content);
    };
    let yaml = &rest[..end];
    let after = &rest[end + 4..];
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    match serde_yaml::from_str::<DeckMeta>(yaml) {
        Ok(meta) => (meta, body),
        Err(e) => {
            warn!("ignoring invalid frontmatter: {e}");
            (DeckMeta::default(), body)
        }
    }
}

fn parse_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut lines = raw.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if let Some(fence) = Fence::opening(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let language = Some(fence.info(trimmed).to_string()).filter(|l| !l.is_empty());
            let mut code = Vec::new();
            for inner in lines.by_ref() {
                if fence.closes(inner.trim()) {
                    break;
                }
                code.push(inner);
            }
            blocks.push(Block::Code {
                language,
                code: code.join("\n"),
            });
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            continue;
        }

        if trimmed == "---" || trimmed == "***" {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Rule);
            continue;
        }

        if let Some((ordered, text)) = list_item(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let indent = line.len() - line.trim_start().len();
            blocks.push(Block::Bullet {
                depth: indent / 2,
                ordered,
                text: text.to_string(),
            });
            continue;
        }

        paragraph.push(trimmed);
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = trimmed[level..].strip_prefix(' ')?;
    Some((level as u8, text.trim()))
}

fn list_item(trimmed: &str) -> Option<(bool, &str)> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(text) = trimmed.strip_prefix(marker) {
            return Some((false, text.trim()));
        }
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(text) = trimmed[digits..].strip_prefix(". ") {
            return Some((true, text.trim()));
        }
    }
    None
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push(Block::Paragraph {
        text: paragraph.join(" "),
    });
    paragraph.clear();
}
