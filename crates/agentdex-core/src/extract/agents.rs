use super::collaborators::role_tokens;
use super::steps::agent_step_re;
use super::{lowercase_key, OrderedSet};

/// Agents a command invokes, in order of first mention.
///
/// Two signals are merged by position: the agent of every numbered
/// `N. **agent** -> action` line anywhere in the text, and every
/// role-suffixed token (`*-developer`, `*-pro`, ...). Names are lowercased
/// and listed once.
pub fn extract_referenced_agents(text: &str) -> Vec<String> {
    let mut mentions: Vec<(usize, String)> = agent_step_re()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| (m.start(), m.as_str().to_lowercase()))
        .collect();
    mentions.extend(role_tokens(text).map(|(pos, t)| (pos, t.to_string())));
    mentions.sort_by_key(|(pos, _)| *pos);

    let mut set = OrderedSet::new(lowercase_key);
    set.extend(mentions.into_iter().map(|(_, name)| name));
    set.into_vec()
}
