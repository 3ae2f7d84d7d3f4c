use crate::assemble::CommandAssembly;
use crate::types::{Gate, WorkflowRecord, WorkflowType};

pub const WORKFLOW_SUFFIX: &str = "-workflow";

pub fn workflow_name(command: &str) -> String {
    format!("{command}{WORKFLOW_SUFFIX}")
}

/// `parallel` when the command allows it, `conditional` when it has gates,
/// otherwise `sequential`. `hybrid` is never inferred.
pub fn infer_type(allows_parallel: bool, gate_count: usize) -> WorkflowType {
    if allows_parallel {
        WorkflowType::Parallel
    } else if gate_count > 0 {
        WorkflowType::Conditional
    } else {
        WorkflowType::Sequential
    }
}

/// Build the workflow for a command, or `None` when no steps were found.
///
/// `agent_sequence` is the referenced-agent list, not the step list: it
/// records who is invoked, while `steps` records what happens.
pub fn synthesize(command: &CommandAssembly) -> Option<WorkflowRecord> {
    if command.steps.is_empty() {
        return None;
    }
    let record = &command.record;
    Some(WorkflowRecord {
        name: workflow_name(&record.name),
        command: record.name.clone(),
        workflow_type: infer_type(record.allows_parallel, command.gates.len()),
        description: record
            .description
            .clone()
            .unwrap_or_else(|| format!("Workflow for /{}", record.name)),
        agent_sequence: command.referenced_agents.clone(),
        steps: command.steps.clone(),
        gates: command.gates.iter().map(|g| gate(g)).collect(),
    })
}

pub fn gate(text: &str) -> Gate {
    let lower = text.to_lowercase();
    Gate {
        name: slugify(text),
        description: text.to_string(),
        required: lower.contains("must") || lower.contains("require"),
    }
}

/// Lowercase, whitespace to `-`, anything outside `[a-z0-9-]` dropped, dash
/// runs collapsed and trimmed.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandRecord;
    use chrono::Utc;
    use std::path::PathBuf;

    fn assembly(allows_parallel: bool, steps: &[&str], gates: &[&str]) -> CommandAssembly {
        let now = Utc::now();
        CommandAssembly {
            record: CommandRecord {
                name: "feature".to_string(),
                description: None,
                workflow_ref: None,
                min_agents: 1,
                max_agents: 2,
                allows_parallel,
                source_path: PathBuf::from("commands/feature.md"),
                raw_body: String::new(),
                created_at: now,
                updated_at: now,
            },
            steps: steps.iter().map(|s| s.to_string()).collect(),
            gates: gates.iter().map(|s| s.to_string()).collect(),
            referenced_agents: vec!["api-designer".into(), "backend-developer".into()],
        }
    }

    #[test]
    fn no_steps_no_workflow() {
        assert!(synthesize(&assembly(true, &[], &["Tests must pass"])).is_none());
    }

    #[test]
    fn type_inference_precedence() {
        assert_eq!(infer_type(true, 3), WorkflowType::Parallel);
        assert_eq!(infer_type(false, 1), WorkflowType::Conditional);
        assert_eq!(infer_type(false, 0), WorkflowType::Sequential);
    }

    #[test]
    fn synthesizes_from_command() {
        let wf = synthesize(&assembly(false, &["api-designer: Define schema"], &[])).unwrap();
        assert_eq!(wf.name, "feature-workflow");
        assert_eq!(wf.command, "feature");
        assert_eq!(wf.workflow_type, WorkflowType::Sequential);
        assert_eq!(wf.description, "Workflow for /feature");
        assert_eq!(wf.agent_sequence, vec!["api-designer", "backend-developer"]);
        assert_eq!(wf.steps, vec!["api-designer: Define schema"]);
    }

    #[test]
    fn gates_are_slugged_and_flagged() {
        let wf = synthesize(&assembly(
            false,
            &["Step 1: Go"],
            &["All tests MUST pass!", "Security review required", "Docs: nice to have"],
        ))
        .unwrap();
        assert_eq!(wf.workflow_type, WorkflowType::Conditional);
        let names: Vec<&str> = wf.gates.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["all-tests-must-pass", "security-review-required", "docs-nice-to-have"]
        );
        let required: Vec<bool> = wf.gates.iter().map(|g| g.required).collect();
        assert_eq!(required, vec![true, true, false]);
        assert_eq!(wf.gates[0].description, "All tests MUST pass!");
    }

    #[test]
    fn slugify_edge_cases() {
        assert_eq!(slugify("  Coverage >= 80% -- enforced "), "coverage-80-enforced");
        assert_eq!(slugify("ünïcode"), "ncode");
    }
}
