//! Heuristic field extractors. Each is a pure `&str -> Vec<String>` used
//! when the corresponding preamble field is absent.

pub mod agents;
pub mod capabilities;
pub mod collaborators;
pub mod description;
pub mod gates;
pub mod steps;

pub use agents::extract_referenced_agents;
pub use capabilities::{extract_capabilities, MAX_CAPABILITIES};
pub use collaborators::{
    extract_collaborators, extract_collaborators_excluding, MAX_COLLABORATORS,
};
pub use description::extract_description;
pub use gates::extract_gates;
pub use steps::{default_tiers, extract_steps, first_non_empty, Strategy, Tier, TierOutcome};

use std::collections::HashSet;

/// Insertion-ordered, deduplicated, optionally capped list of strings.
pub(crate) struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
    cap: Option<usize>,
    key: fn(&str) -> String,
}

impl OrderedSet {
    pub(crate) fn new(key: fn(&str) -> String) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cap: None,
            key,
        }
    }

    pub(crate) fn capped(cap: usize, key: fn(&str) -> String) -> Self {
        Self {
            cap: Some(cap),
            ..Self::new(key)
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.items.len() >= cap)
    }

    /// Returns true if `item` was added.
    pub(crate) fn insert(&mut self, item: String) -> bool {
        if self.is_full() {
            return false;
        }
        if self.seen.insert((self.key)(&item)) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub(crate) fn extend(&mut self, items: impl IntoIterator<Item = String>) {
        for item in items {
            if self.is_full() {
                break;
            }
            self.insert(item);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.items
    }
}

pub(crate) fn exact_key(s: &str) -> String {
    s.to_string()
}

pub(crate) fn lowercase_key(s: &str) -> String {
    s.to_lowercase()
}

/// A token is a lowercase, hyphen-joined identifier such as `api-designer`.
pub(crate) fn is_lowercase_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .split('-')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
}
