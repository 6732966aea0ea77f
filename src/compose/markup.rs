//! Tag-level scanning of the markup buffer.
//!
//! Everything here is regex based and total: malformed or unbalanced markup
//! simply produces fewer matches, never an error. Positions are byte offsets
//! into the original markup so all edits can be spliced in one pass.
//!
//! Comments and the text of `<script>`/`<style>` blocks are raw text to the
//! browser. They are located first, in one left-to-right pass, and every tag
//! search skips them, so `<!-- <script> -->` or `'<head>'` inside a script
//! never act as anchors or blocks.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static DOCUMENT_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\b|<html\b").unwrap());
static DOCTYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<!doctype\b[^>]*>").unwrap());
static BODY_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").unwrap());
static RAW_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?P<comment><!--.*?-->)|<script\b(?P<attrs>[^>]*)>(?P<script>.*?)</script\s*>|<style\b[^>]*>(?P<style>.*?)</style\s*>",
    )
    .unwrap()
});
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)src\s*=").unwrap());
static TYPE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)type\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});
static HEAD_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").unwrap());
static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());
static BODY_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());
static HTML_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").unwrap());
static HTML_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</html\s*>").unwrap());

/// `type` values browsers execute as classic scripts, plus `module`.
const SCRIPT_TYPES: &[&str] = &[
    "module",
    "text/javascript",
    "application/javascript",
    "application/ecmascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/x-ecmascript",
    "text/x-javascript",
    "text/jscript",
    "text/livescript",
];

// ============================================================================
// Classification
// ============================================================================

/// Whether the markup buffer is a whole document or a body fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// Has a doctype or an `<html>` root.
    Complete,
    Fragment,
}

pub fn shape(markup: &str) -> DocumentShape {
    if Scan::new(markup).find(&DOCUMENT_ROOT).is_some() {
        DocumentShape::Complete
    } else {
        DocumentShape::Fragment
    }
}

/// Content between the first `<body>` and the following `</body>`.
pub fn extract_body(markup: &str) -> Option<&str> {
    BODY_CONTENT
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ============================================================================
// Raw text blocks
// ============================================================================

/// A `<tag>…</tag>` block located in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Whole block including both tags.
    pub whole: Range<usize>,
    /// Text between the tags.
    pub content: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RawKind {
    Comment,
    Script { attrs: Range<usize> },
    Style,
}

#[derive(Debug, Clone)]
struct Raw {
    kind: RawKind,
    block: Block,
}

/// Markup with its comments and raw text blocks located.
pub struct Scan<'a> {
    source: &'a str,
    raw: Vec<Raw>,
}

impl<'a> Scan<'a> {
    pub fn new(source: &'a str) -> Self {
        let raw = RAW_TEXT
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?.range();
                if caps.name("comment").is_some() {
                    return Some(Raw {
                        kind: RawKind::Comment,
                        block: Block {
                            content: whole.clone(),
                            whole,
                        },
                    });
                }
                if let Some(content) = caps.name("script") {
                    let attrs = caps.name("attrs").map_or(0..0, |m| m.range());
                    return Some(Raw {
                        kind: RawKind::Script { attrs },
                        block: Block {
                            whole,
                            content: content.range(),
                        },
                    });
                }
                let content = caps.name("style")?;
                Some(Raw {
                    kind: RawKind::Style,
                    block: Block {
                        whole,
                        content: content.range(),
                    },
                })
            })
            .collect();
        Self { source, raw }
    }

    /// Inline `<script>` blocks the browser executes.
    ///
    /// Scripts with a `src` attribute are external resources, and data
    /// blocks (`application/ld+json`, `importmap`, templates) never run;
    /// neither is treated as the user script slot.
    pub fn inline_scripts(&self) -> Vec<Block> {
        self.raw
            .iter()
            .filter_map(|raw| match &raw.kind {
                RawKind::Script { attrs } if is_inline_executable(&self.source[attrs.clone()]) => {
                    Some(raw.block.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// `<style>` blocks outside comments and scripts.
    pub fn styles(&self) -> Vec<Block> {
        self.raw
            .iter()
            .filter(|raw| raw.kind == RawKind::Style)
            .map(|raw| raw.block.clone())
            .collect()
    }

    /// Where the error-reporting runtime goes: start of head, else start of
    /// the root element, else after the doctype.
    pub fn runtime_anchor(&self) -> usize {
        self.find(&HEAD_OPEN)
            .or_else(|| self.find(&HTML_OPEN))
            .map_or_else(|| self.prologue_end(), |m| m.end)
    }

    /// Where a missing style block goes: end of head, else before `<body>`,
    /// else start of the root element, else after the doctype.
    pub fn style_anchor(&self) -> usize {
        if let Some(m) = self.find(&HEAD_CLOSE) {
            return m.start;
        }
        if let Some(m) = self.find(&BODY_OPEN) {
            return m.start;
        }
        self.find(&HTML_OPEN)
            .map_or_else(|| self.prologue_end(), |m| m.end)
    }

    /// Where a missing script block goes: before the last `</body>`, else
    /// before the last `</html>`, else the very end.
    pub fn script_anchor(&self) -> usize {
        self.find_last(&BODY_CLOSE)
            .or_else(|| self.find_last(&HTML_CLOSE))
            .map_or(self.source.len(), |m| m.start)
    }

    /// Position right after the doctype, or 0.
    fn prologue_end(&self) -> usize {
        self.find(&DOCTYPE).map_or(0, |m| m.end)
    }

    /// Stretches of markup between raw text blocks, in order.
    fn gaps(&self) -> Vec<Range<usize>> {
        let mut gaps = Vec::with_capacity(self.raw.len() + 1);
        let mut cursor = 0;
        for raw in &self.raw {
            gaps.push(cursor..raw.block.whole.start);
            cursor = raw.block.whole.end;
        }
        gaps.push(cursor..self.source.len());
        gaps
    }

    fn find(&self, re: &Regex) -> Option<Range<usize>> {
        self.gaps().into_iter().find_map(|gap| {
            re.find(&self.source[gap.clone()])
                .map(|m| gap.start + m.start()..gap.start + m.end())
        })
    }

    fn find_last(&self, re: &Regex) -> Option<Range<usize>> {
        self.gaps().into_iter().rev().find_map(|gap| {
            re.find_iter(&self.source[gap.clone()])
                .last()
                .map(|m| gap.start + m.start()..gap.start + m.end())
        })
    }
}

fn is_inline_executable(attrs: &str) -> bool {
    if SRC_ATTR.is_match(attrs) {
        return false;
    }
    let Some(caps) = TYPE_ATTR.captures(attrs) else {
        return true;
    };
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str());
    // Parameters such as `; charset=utf-8` do not change the type
    let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence.is_empty() || SCRIPT_TYPES.contains(&essence.as_str())
}

// ============================================================================
// Splicing
// ============================================================================

/// One replacement applied to the original markup.
#[derive(Debug, Clone)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
        }
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn remove(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }
}

/// Apply edits in a single pass over `source`.
///
/// Edits are ordered by start position; insertions at the same position keep
/// the order they were given in. An insertion that falls inside an already
/// applied edit moves to the end of that edit; any other overlapping edit is
/// dropped.
pub fn splice(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);

    let extra: usize = edits.iter().map(|edit| edit.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;

    for edit in edits {
        if edit.range.end > source.len() {
            continue;
        }
        let start = if edit.range.is_empty() {
            edit.range.start.max(cursor)
        } else if edit.range.start < cursor {
            continue;
        } else {
            edit.range.start
        };
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.text);
        cursor = edit.range.end.max(start);
    }

    out.push_str(&source[cursor..]);
    out
}

// ============================================================================
// Tests
// ============================================================================
