//! Run command - organize every configured repository.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::models::Category;
use crate::orchestrator::{self, RunReport};
use crate::report::COMBINED_DIR;

/// Execute the run command
pub fn execute(config: &Config) -> Result<()> {
    println!(
        "{} Organizing sources from {} repositor{}...",
        "→".cyan().bold(),
        config.repositories.len(),
        if config.repositories.len() == 1 { "y" } else { "ies" }
    );

    let report = orchestrator::run(config).context("Failed to organize sources")?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &RunReport) {
    let stats = &report.aggregate.stats;

    println!("\n{}", "Statistics".bold());
    println!("  Files found:      {}", stats.files_found());
    println!("  Processed:        {}", stats.files_processed());
    println!("  Failed:           {}", stats.files_failed());

    if !report.processed.is_empty() {
        println!("\n{}", "Repositories".bold());
        for name in &report.processed {
            let total = stats.repositories.get(name).map(|r| r.total()).unwrap_or(0);
            println!("  {} {name}: {total} sources", "•".cyan());
        }
    }
    for name in &report.skipped {
        println!("  {} {name}: unavailable, skipped", "•".yellow());
    }

    println!("\n{}", "Combined files".bold());
    for category in Category::ALL {
        let records = report.aggregate.combined.get(category);
        let mut repos: Vec<_> = records.iter().map(|r| r.origin_repository.as_str()).collect();
        repos.dedup();
        println!(
            "  {} {COMBINED_DIR}/{}: {} sources from {} repositories",
            "•".cyan(),
            category.file_name(),
            records.len(),
            repos.len()
        );
    }

    if report.has_diagnostics() {
        println!(
            "\n{} {} issue(s) recorded, see summary.json:",
            "⚠".yellow().bold(),
            report.diagnostics.len()
        );
        for diagnostic in &report.diagnostics {
            println!("  {} {diagnostic}", "-".yellow());
        }
    }

    println!(
        "\n{} Wrote {} files to {}",
        "✓".green().bold(),
        report.files_written,
        report.output_dir.display()
    );
}
