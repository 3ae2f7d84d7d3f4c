use super::{exact_key, OrderedSet};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_CAPABILITIES: usize = 12;

const BULLET_PHRASE_LEN: std::ops::RangeInclusive<usize> = 2..=60;
const HEADING_PHRASE_LEN: std::ops::RangeInclusive<usize> = 2..=50;

/// Title-Case words, optionally joined by short lowercase connectors.
macro_rules! title_phrase {
    () => {
        r"[A-Z][\w&/.+#'-]*(?:[ \t]+(?:(?:and|or|of|for|the|to|in|on|with|&)[ \t]+)?[A-Z][\w&/.+#'-]*)*"
    };
}

static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?m)^[ \t]*[-*+][ \t]+(?:\*\*|__)?(",
            title_phrase!(),
            r")(?:\*\*|__)?(?:[ \t]*:|[ \t]+[-–—][ \t]|[ \t]+(?:maintained|tracked|enabled|managed|implemented|supported|configured|optimized|automated|ensured)\b)"
        ))
        .unwrap()
    })
}

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| {
        Regex::new(concat!(r"(?m)^[ \t]*(", title_phrase!(), r"):[ \t]*\r?$")).unwrap()
    })
}

fn phrases(re: &Regex, text: &str, len: std::ops::RangeInclusive<usize>) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|cap| {
            let phrase = cap.get(1)?.as_str().trim();
            len.contains(&phrase.chars().count())
                .then(|| phrase.to_string())
        })
        .collect()
}

/// Capability phrases from bullet items (`- **Schema Design**: ...`) first,
/// then from stand-alone `Title Case Phrase:` lines. Deduplicated exactly
/// and capped at [`MAX_CAPABILITIES`].
pub fn extract_capabilities(text: &str) -> Vec<String> {
    let mut set = OrderedSet::capped(MAX_CAPABILITIES, exact_key);
    set.extend(phrases(bullet_re(), text, BULLET_PHRASE_LEN));
    set.extend(phrases(heading_re(), text, HEADING_PHRASE_LEN));
    set.into_vec()
}
