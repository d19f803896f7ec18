//! History command - show recent compliance checks

use super::setup;
use super::SessionArgs;
use crate::models::HistoryRecord;
use anyhow::Result;
use console::style;

/// Run the history command
pub fn run(args: &SessionArgs, limit: usize, json: bool) -> Result<()> {
    let store = setup::open_history(args)?;
    let records = store.recent(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No compliance checks recorded yet.");
        return Ok(());
    }

    println!("\n{}", style("Compliance History").bold());
    println!("{}", style("─".repeat(60)).dim());
    for record in &records {
        print_record(record);
    }
    println!();

    Ok(())
}

fn print_record(record: &HistoryRecord) {
    let status = if record.is_compliant {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!(
        "{:>5}  {}  {:.2}  {}",
        style(format!("#{}", record.id)).dim(),
        record.timestamp,
        record.overall_score,
        status
    );
    let categories: Vec<String> = record
        .category_scores
        .iter()
        .map(|(name, score)| format!("{} {:.2}", name, score))
        .collect();
    if !categories.is_empty() {
        println!("       {}", style(categories.join(" | ")).dim());
    }
}
