//! Markdown structure: headings, sections and fenced code blocks.
//!
//! Parsed with pulldown-cmark, so fences and headings follow CommonMark.
//! Source byte ranges are kept and sections are returned as slices of the
//! original text.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use std::ops::Range;

/// A heading with its plain-text title and source byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub title: String,
    pub range: Range<usize>,
}

/// Every heading in `text`, in document order. Headings inside code
/// blocks are not headings.
pub fn headings(text: &str) -> Vec<Heading> {
    let mut out = Vec::new();
    let mut open: Option<Heading> = None;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some(Heading {
                    level: level as usize,
                    title: String::new(),
                    range,
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = open.take() {
                    heading.title = heading.title.trim().to_string();
                    out.push(heading);
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some(heading) = open.as_mut() {
                    heading.title.push_str(&t);
                }
            }
            _ => {}
        }
    }
    out
}

/// Where a section stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The next heading of the same or a higher level.
    SameOrHigher,
    /// As `SameOrHigher`, and also any heading preceded by a blank line.
    BlankLineOrHigher,
}

impl Boundary {
    fn closes(self, text: &str, level: usize, next: &Heading) -> bool {
        match self {
            Boundary::SameOrHigher => next.level <= level,
            Boundary::BlankLineOrHigher => {
                next.level <= level || follows_blank_line(text, next.range.start)
            }
        }
    }
}

fn follows_blank_line(text: &str, start: usize) -> bool {
    let before = text[..start].trim_end_matches([' ', '\t']);
    let Some(before) = before.strip_suffix('\n') else {
        return false;
    };
    let before = before.strip_suffix('\r').unwrap_or(before);
    before
        .rsplit('\n')
        .next()
        .is_some_and(|line| line.trim().is_empty())
}

/// Body of the first section whose heading satisfies `matches(level, title)`,
/// excluding the heading itself.
pub fn section<'a>(
    text: &'a str,
    matches: impl Fn(usize, &str) -> bool,
    boundary: Boundary,
) -> Option<&'a str> {
    let headings = headings(text);
    let open = headings
        .iter()
        .position(|h| matches(h.level, &h.title))?;
    let opener = &headings[open];

    let body_start = past_line_end(text, opener.range.end);
    let body_end = headings[open + 1..]
        .iter()
        .find(|h| boundary.closes(text, opener.level, h))
        .map(|h| h.range.start)
        .unwrap_or(text.len());

    Some(&text[body_start..body_end.max(body_start)])
}

/// `pos`, moved past the line ending when it sits right before one.
fn past_line_end(text: &str, pos: usize) -> usize {
    if text[..pos].ends_with('\n') {
        return pos;
    }
    let rest = &text[pos..];
    if rest.starts_with("\r\n") {
        pos + 2
    } else if rest.starts_with('\n') {
        pos + 1
    } else {
        pos
    }
}

/// Contents of every fenced code block, without the fence lines. An
/// unterminated fence runs to the end of the text.
pub fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut in_fence = false;
    let mut content: Option<(usize, usize)> = None;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                in_fence = true;
                content = None;
            }
            Event::Text(_) if in_fence => {
                content = Some(match content {
                    Some((start, _)) => (start, range.end),
                    None => (range.start, range.end),
                });
            }
            Event::End(TagEnd::CodeBlock) if in_fence => {
                in_fence = false;
                blocks.push(content.take().map_or("", |(start, end)| &text[start..end]));
            }
            _ => {}
        }
    }
    blocks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
