/// Split a deck body (frontmatter already removed) into raw slide strings.
///
/// Two things start a new slide:
/// 1. a `---` line with blank lines (or the document edge) on both sides
/// 2. a `# ` heading when the current slide already has content
///
/// Nothing inside a fenced code block ever splits.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<Fence> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some(open) = fence {
            if open.closes(trimmed) {
                fence = None;
            }
            current.push(line);
            continue;
        }
        if let Some(open) = Fence::opening(trimmed) {
            fence = Some(open);
            current.push(line);
            continue;
        }

        if trimmed == "---" && blank_before(&current) && blank_after(&lines, i) {
            flush(&mut current, &mut slides);
            continue;
        }

        if trimmed.starts_with("# ") && has_content(&current) {
            flush(&mut current, &mut slides);
        }
        current.push(line);
    }
    flush(&mut current, &mut slides);
    slides
}

/// An open code fence: three or more backticks or tildes. Only a run of the
/// same marker at least as long closes it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    pub(crate) fn opening(trimmed: &str) -> Option<Self> {
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    /// Info string after the opening run, e.g. the language.
    pub(crate) fn info<'a>(&self, trimmed: &'a str) -> &'a str {
        trimmed
            .get(self.len * self.marker.len_utf8()..)
            .unwrap_or_default()
            .trim()
    }

    pub(crate) fn closes(&self, trimmed: &str) -> bool {
        let run = trimmed.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && trimmed[run * self.marker.len_utf8()..].trim().is_empty()
    }
}

fn blank_before(current: &[&str]) -> bool {
    current.last().is_none_or(|l| l.trim().is_empty())
}

fn blank_after(lines: &[&str], i: usize) -> bool {
    lines.get(i + 1).is_none_or(|l| l.trim().is_empty())
}

fn has_content(current: &[&str]) -> bool {
    current.iter().any(|l| !l.trim().is_empty())
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    current.clear();
    if !text.is_empty() {
        slides.push(text);
    }
}
