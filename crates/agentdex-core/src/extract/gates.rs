use super::{exact_key, OrderedSet};
use crate::markdown::{self, Boundary};
use regex::Regex;
use std::sync::OnceLock;

/// Gate text must be longer than this many characters.
const MIN_GATE_CHARS: usize = 5;

static GATE_RE: OnceLock<Regex> = OnceLock::new();

fn gate_re() -> &'static Regex {
    GATE_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*[-*+][ \t]+(?:\[[ xX]\][ \t]*)?(.+?)[ \t]*\r?$").unwrap()
    })
}

/// Bullet items of the `## Gates` section, checkbox markers removed.
/// Documents without that section have no gates.
pub fn extract_gates(text: &str) -> Vec<String> {
    let Some(section) = markdown::section(
        text,
        |level, title| level == 2 && title.eq_ignore_ascii_case("gates"),
        Boundary::SameOrHigher,
    ) else {
        return Vec::new();
    };

    let mut set = OrderedSet::new(exact_key);
    set.extend(
        gate_re()
            .captures_iter(section)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
            .filter(|gate| gate.chars().count() > MIN_GATE_CHARS),
    );
    set.into_vec()
}
