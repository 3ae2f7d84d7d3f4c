use crate::output::{list, print_json};
use agentdex_core::types::{AgentRecord, CommandRecord, EntityKind, WorkflowRecord};
use std::path::Path;

pub fn run(root: &Path, kind: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let kind: EntityKind = kind.parse().map_err(anyhow::Error::msg)?;
    let result = super::parse_root(root)?;

    let not_found = || anyhow::anyhow!("{kind} '{name}' not found");
    match kind {
        EntityKind::Agent => {
            let agent = result.agent(name).ok_or_else(not_found)?;
            if json {
                print_json(agent)
            } else {
                print_agent(agent);
                Ok(())
            }
        }
        EntityKind::Command => {
            let command = result.command(name).ok_or_else(not_found)?;
            if json {
                print_json(command)
            } else {
                print_command(command);
                Ok(())
            }
        }
        EntityKind::Workflow => {
            let workflow = result.workflow(name).ok_or_else(not_found)?;
            if json {
                print_json(workflow)
            } else {
                print_workflow(workflow);
                Ok(())
            }
        }
    }
}

fn print_agent(a: &AgentRecord) {
    println!("Agent: {}", a.name);
    if let Some(human) = &a.human_name {
        println!("Human name:    {human}");
    }
    if let Some(color) = &a.color {
        println!("Color:         {color}");
    }
    println!("Description:   {}", a.description);
    println!("Tools:         {}", list(&a.tools));
    println!("Capabilities:  {}", list(&a.capabilities));
    println!("Collaborators: {}", list(&a.collaborators));
    println!("Source:        {}", a.source_path.display());
}

fn print_command(c: &CommandRecord) {
    println!("Command: /{}", c.name);
    if let Some(desc) = &c.description {
        println!("Description: {desc}");
    }
    println!("Agents:      {}..{}", c.min_agents, c.max_agents);
    println!("Parallel:    {}", c.allows_parallel);
    println!("Workflow:    {}", c.workflow_ref.as_deref().unwrap_or("-"));
    println!("Source:      {}", c.source_path.display());
}

fn print_workflow(w: &WorkflowRecord) {
    println!("Workflow: {} ({})", w.name, w.workflow_type);
    println!("Command:  /{}", w.command);
    println!("Agents:   {}", list(&w.agent_sequence));
    println!();
    println!("Steps:");
    for (i, step) in w.steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
    if !w.gates.is_empty() {
        println!();
        println!("Gates:");
        for gate in &w.gates {
            let marker = if gate.required { "required" } else { "optional" };
            println!("  [{marker}] {}", gate.description);
        }
    }
}
