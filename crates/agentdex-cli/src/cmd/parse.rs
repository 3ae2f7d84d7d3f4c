use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let result = super::parse_root(root)?;

    if json {
        return print_json(&result);
    }

    println!("Agents ({})", result.agents.len());
    print_table(
        &["NAME", "CAPABILITIES", "COLLABORATORS", "DESCRIPTION"],
        result
            .agents
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.capabilities.len().to_string(),
                    a.collaborators.len().to_string(),
                    a.description.clone(),
                ]
            })
            .collect(),
    );

    println!();
    println!("Commands ({})", result.commands.len());
    print_table(
        &["NAME", "AGENTS", "PARALLEL", "WORKFLOW"],
        result
            .commands
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    format!("{}..{}", c.min_agents, c.max_agents),
                    c.allows_parallel.to_string(),
                    c.workflow_ref.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect(),
    );

    println!();
    println!("Workflows ({})", result.workflows.len());
    print_table(
        &["NAME", "TYPE", "STEPS", "GATES"],
        result
            .workflows
            .iter()
            .map(|w| {
                vec![
                    w.name.clone(),
                    w.workflow_type.to_string(),
                    w.steps.len().to_string(),
                    w.gates.len().to_string(),
                ]
            })
            .collect(),
    );

    if !result.errors.is_empty() {
        println!();
        println!("Errors ({})", result.errors.len());
        for e in &result.errors {
            match &e.cause {
                Some(cause) => println!("  {}: {} ({cause})", e.source_path.display(), e.message),
                None => println!("  {}: {}", e.source_path.display(), e.message),
            }
        }
    }

    Ok(())
}
