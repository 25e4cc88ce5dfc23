use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use mr_core::{ObjectRecord, Snapshot};

pub fn run(path: &Path, entity: Option<&str>) -> Result<(), String> {
    let snapshot = super::load_snapshot(path)?;
    match entity {
        Some(id) => show_entity(&snapshot, id),
        None => {
            summarize(&snapshot);
            Ok(())
        }
    }
}

fn name_of(record: &ObjectRecord) -> String {
    record
        .state
        .get("name")
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

fn summarize(snapshot: &Snapshot) {
    if snapshot.objects.is_empty() {
        println!("  No objects.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Location", "Skills", "Reactions"]);
        for record in &snapshot.objects {
            let location = record
                .state
                .get("location")
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                record.id.to_string(),
                name_of(record),
                location,
                record.skills.join(", "),
                record.reactions.join(", "),
            ]);
        }
        println!("{table}");
    }

    let bindings: usize = snapshot.listeners.values().map(Vec::len).sum();
    if bindings > 0 {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Event", "Listener", "Script"]);
        for (event, listeners) in &snapshot.listeners {
            for binding in listeners {
                table.add_row(vec![
                    event.clone(),
                    binding.listener.to_string(),
                    binding.script.clone(),
                ]);
            }
        }
        println!();
        println!("{table}");
    }

    println!();
    println!(
        "  {} objects, {} listeners",
        snapshot.objects.len(),
        bindings
    );
}

fn show_entity(snapshot: &Snapshot, id: &str) -> Result<(), String> {
    let record = snapshot
        .objects
        .iter()
        .find(|r| r.id.as_str() == id)
        .ok_or_else(|| format!("no object '{id}' in snapshot"))?;

    println!("{}", name_of(record).bold().underline());
    println!("  {}", format!("id: {}", record.id).dimmed());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in &record.state {
        table.add_row(vec![key.clone(), value.to_string()]);
    }
    println!("{table}");

    if !record.skills.is_empty() {
        println!("  Skills: {}", record.skills.join(", "));
    }
    if !record.reactions.is_empty() {
        println!("  Reactions: {}", record.reactions.join(", "));
    }
    Ok(())
}
