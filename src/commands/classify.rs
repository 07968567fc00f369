//! Classify command - show how a declared type would be bucketed.

use anyhow::Result;
use colored::Colorize;

use crate::classify::{classify, normalize_type};

/// Execute the classify command
pub fn execute(type_value: &str) -> Result<()> {
    let category = classify(Some(type_value));
    println!(
        "{} {} (normalized type: {})",
        "→".cyan().bold(),
        category.to_string().bold(),
        normalize_type(Some(type_value))
    );
    Ok(())
}
