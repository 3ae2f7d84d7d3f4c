use crate::output::{print_json, print_table};
use crate::store::JsonFileStore;
use agentdex_core::sync::{SyncAction, SyncPlan, SyncPlanner};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, store_path: &Path, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let result = super::parse_root(root)?;
    let mut store = JsonFileStore::open(store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;

    let plan = SyncPlanner::plan(&result, &store);

    if dry_run {
        if json {
            return print_json(&plan);
        }
        print_plan(&plan);
        return Ok(());
    }

    let report = SyncPlanner::apply(plan, &mut store);
    store
        .save()
        .with_context(|| format!("failed to write store {}", store_path.display()))?;

    if json {
        return print_json(&report);
    }
    println!(
        "Synced: {} created, {} updated, {} unchanged",
        report.created.len(),
        report.updated.len(),
        report.unchanged
    );
    for label in &report.created {
        println!("  + {label}");
    }
    for label in &report.updated {
        println!("  ~ {label}");
    }
    for e in &report.errors {
        println!("  ! {}:{}: {}", e.kind, e.name, e.message);
    }
    Ok(())
}

fn print_plan(plan: &SyncPlan) {
    let rows = plan
        .ops
        .iter()
        .filter(|op| op.action != SyncAction::Unchanged)
        .map(|op| {
            let action = match op.action {
                SyncAction::Create => "create",
                SyncAction::Update => "update",
                SyncAction::Unchanged => "unchanged",
            };
            vec![
                action.to_string(),
                op.input.kind().to_string(),
                op.input.name().to_string(),
            ]
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        println!("Nothing to sync.");
    } else {
        print_table(&["ACTION", "KIND", "NAME"], rows);
    }
    println!(
        "Plan: {} create, {} update, {} unchanged",
        plan.count(SyncAction::Create),
        plan.count(SyncAction::Update),
        plan.count(SyncAction::Unchanged)
    );
    for e in &plan.errors {
        println!("  ! {}:{}: {}", e.kind, e.name, e.message);
    }
}
