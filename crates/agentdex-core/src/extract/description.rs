use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Longest description taken from prose, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 280;

/// The first top-level prose paragraph of `text`, with inline markup
/// removed and joined onto one line. Headings, lists, tables, quotes and
/// code blocks are skipped.
pub fn extract_description(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut paragraph: Option<String> = None;

    for event in Parser::new_ext(text, Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Paragraph) if depth == 0 => {
                depth += 1;
                paragraph = Some(String::new());
            }
            Event::Start(_) => depth += 1,
            Event::End(TagEnd::Paragraph) if depth == 1 => {
                depth -= 1;
                let joined = paragraph
                    .take()
                    .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
                    .unwrap_or_default();
                if !joined.is_empty() {
                    return Some(truncate_at_word(&joined, MAX_DESCRIPTION_CHARS));
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(t) | Event::Code(t) => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(p) = paragraph.as_mut() {
                    p.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate_at_word(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(i) if i > 0 => cut[..i].trim_end().to_string(),
        _ => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_paragraph_after_headings() {
        let text = "# Backend Developer\n\nYou are a **senior** backend developer\nfocused on `APIs`.\n\nSecond paragraph.";
        assert_eq!(
            extract_description(text).as_deref(),
            Some("You are a senior backend developer focused on APIs.")
        );
    }

    #[test]
    fn skips_lists_rules_and_code() {
        let text = "---\n\n- item one\n1. numbered\n\n```\nnot prose\n\nstill code\n```\nIntro line.\n";
        assert_eq!(extract_description(text).as_deref(), Some("Intro line."));
    }

    #[test]
    fn paragraph_stops_at_heading_or_list() {
        assert_eq!(
            extract_description("Intro line.\n## Section\nMore").as_deref(),
            Some("Intro line.")
        );
        assert_eq!(
            extract_description("Keeps things running.\n- Incident Response: on call\n").as_deref(),
            Some("Keeps things running.")
        );
    }

    #[test]
    fn mismatched_fences_keep_prose_inside_code() {
        let text = "```\n~~~\nNot a description.\n```\nReal description.\n";
        assert_eq!(extract_description(text).as_deref(), Some("Real description."));
    }

    #[test]
    fn no_prose_yields_none() {
        assert_eq!(extract_description("# Only a title\n"), None);
        assert_eq!(extract_description("## Steps\n- one\n- two\n"), None);
        assert_eq!(extract_description("```\ncode\n```\n"), None);
        assert_eq!(extract_description(""), None);
    }

    #[test]
    fn long_prose_is_truncated_on_a_word_boundary() {
        let text = "word ".repeat(100);
        let desc = extract_description(&text).unwrap();
        assert!(desc.chars().count() <= MAX_DESCRIPTION_CHARS);
        assert!(desc.ends_with("word"));
    }
}
