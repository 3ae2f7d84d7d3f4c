use super::{is_lowercase_token, lowercase_key, OrderedSet};
use crate::markdown::{self, Boundary};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_COLLABORATORS: usize = 15;

const INTEGRATION_HEADING: &str = "integration with other agents";

/// Suffixes that mark a hyphenated token as an agent name.
pub const ROLE_SUFFIXES: &[&str] = &[
    "-developer",
    "-designer",
    "-engineer",
    "-expert",
    "-auditor",
    "-specialist",
    "-manager",
    "-architect",
    "-pro",
];

static VERB_RE: OnceLock<Regex> = OnceLock::new();
static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn verb_re() -> &'static Regex {
    VERB_RE.get_or_init(|| {
        Regex::new(
            r"(?i:\b(?:with|support(?:s|ing|ed)?|help(?:s|ing|ed)?|partner(?:s|ing|ed)?|coordinat(?:e|es|ing|ed)|consult(?:s|ing|ed)?|sync(?:s|ing|ed)?|engag(?:e|es|ing|ed)|align(?:s|ing|ed)?)\b)[ \t]+(?:(?i:with)[ \t]+)?[*`_]*([A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)*)",
        )
        .unwrap()
    })
}

/// Maximal hyphen-joined words, so `backend-developer-tools` is one token.
fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)+").unwrap())
}

pub fn has_role_suffix(token: &str) -> bool {
    is_lowercase_token(token)
        && ROLE_SUFFIXES
            .iter()
            .any(|suffix| token.len() > suffix.len() && token.ends_with(suffix))
}

/// Collaborators named after a collaboration verb inside the
/// "Integration with other agents" section.
fn integration_section(text: &str) -> Vec<String> {
    let Some(section) = markdown::section(
        text,
        |_, title| title.to_lowercase().contains(INTEGRATION_HEADING),
        Boundary::BlankLineOrHigher,
    ) else {
        return Vec::new();
    };
    verb_re()
        .captures_iter(section)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .filter(|token| is_lowercase_token(token) && (2..=3).contains(&token.split('-').count()))
        .map(str::to_string)
        .collect()
}

/// Any role-suffixed agent name anywhere in the document.
pub(crate) fn role_tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    token_re()
        .find_iter(text)
        .filter(|m| has_role_suffix(m.as_str()))
        .map(|m| (m.start(), m.as_str()))
}

/// Collaborator names: the integration section first, then every
/// role-suffixed token in the whole text. Lowercased, deduplicated and
/// capped at [`MAX_COLLABORATORS`].
pub fn extract_collaborators(text: &str) -> Vec<String> {
    extract_collaborators_excluding(text, "")
}

/// As [`extract_collaborators`], skipping `own_name` before the cap applies
/// so an agent mentioning itself does not cost a slot.
pub fn extract_collaborators_excluding(text: &str, own_name: &str) -> Vec<String> {
    let mut set = OrderedSet::capped(MAX_COLLABORATORS, lowercase_key);
    let candidates = integration_section(text)
        .into_iter()
        .chain(role_tokens(text).map(|(_, t)| t.to_lowercase()))
        .filter(|name| !name.eq_ignore_ascii_case(own_name));
    set.extend(candidates);
    set.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_section_verbs() {
        let text = "\
## Integration with other agents

- Coordinate with api-gateway on routing
- Support **frontend-lead** during rollout
- Consult `data-platform-team` for schemas
- Partner with the security team
- Sync with very-long-hyphen-name

## Next
- Coordinate with ignored-here
";
        assert_eq!(
            extract_collaborators(text),
            vec!["api-gateway", "frontend-lead", "data-platform-team"]
        );
    }

    #[test]
    fn whole_document_role_suffix_scan() {
        let text = "Hand off to backend-developer.\nThe backend-developer reviews.\nAsk backend-developer again, or a python-pro.";
        assert_eq!(
            extract_collaborators(text),
            vec!["backend-developer", "python-pro"]
        );
    }

    #[test]
    fn tokens_are_matched_maximally() {
        let text = "uses backend-developer-tools and Frontend-Developer, not a-developer-kit";
        assert!(extract_collaborators(text).is_empty());
    }

    #[test]
    fn caps_at_fifteen() {
        let text: String = (0..30).map(|i| format!("agent{i}-engineer ")).collect();
        let collabs = extract_collaborators(&text);
        assert_eq!(collabs.len(), MAX_COLLABORATORS);
        assert_eq!(collabs[0], "agent0-engineer");
    }

    #[test]
    fn section_and_scan_are_merged_without_duplicates() {
        let text = "\
### Integration With Other Agents
Works with qa-expert closely.

Mentions qa-expert and security-auditor later.
";
        assert_eq!(
            extract_collaborators(text),
            vec!["qa-expert", "security-auditor"]
        );
    }

    #[test]
    fn own_name_does_not_use_a_slot() {
        let mut text = String::from("I am lead-engineer.\n");
        for i in 0..MAX_COLLABORATORS {
            text.push_str(&format!("Pair with t{i}-engineer.\n"));
        }
        let collabs = extract_collaborators_excluding(&text, "lead-engineer");
        assert_eq!(collabs.len(), MAX_COLLABORATORS);
        assert!(!collabs.iter().any(|c| c == "lead-engineer"));
        assert_eq!(collabs.last().map(String::as_str), Some("t14-engineer"));
    }

    #[test]
    fn subheading_without_blank_line_stays_in_section() {
        let text = "\
## Integration with other agents
- Coordinate with api-gateway on routing
### Data
- Partner with data-platform on schemas

### Unrelated
- Sync with ignored-here
";
        assert_eq!(
            extract_collaborators(text),
            vec!["api-gateway", "data-platform"]
        );
    }

    #[test]
    fn backticked_long_names_are_rejected() {
        let text = "\
## Integration with other agents
- Consult `data-platform-team` for schemas
- Consult `very-long-hyphen-name` for nothing
- Align with `ops`
";
        assert_eq!(extract_collaborators(text), vec!["data-platform-team"]);
    }

    #[test]
    fn bare_suffix_is_not_an_agent() {
        assert!(!has_role_suffix("-pro"));
        assert!(!has_role_suffix("pro"));
        assert!(has_role_suffix("rust-pro"));
    }
}
