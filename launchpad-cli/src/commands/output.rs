//! Terminal output helpers shared by the command handlers

use colored::*;
use launchpad_runner::ToolOutput;
use launchpad_runner::verify::VerificationReport;

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn step(message: &str) {
    println!("{} {}", "▸".cyan(), message.bold());
}

/// Prints what a pass-through tool printed
pub fn tool_output(output: &ToolOutput) {
    let text = output.combined();
    if !text.trim().is_empty() {
        println!("{}", text.trim_end());
    }
}

/// Prints one line per probed endpoint
pub fn verification_report(report: &VerificationReport) {
    for outcome in &report.outcomes {
        let status = match (outcome.status, &outcome.error) {
            (Some(status), _) => status.to_string(),
            (None, Some(error)) => error.clone(),
            (None, None) => "-".to_string(),
        };

        let marker = if outcome.success {
            "PASS".green().bold()
        } else if outcome.mandatory {
            "FAIL".red().bold()
        } else {
            "WARN".yellow().bold()
        };

        println!(
            "  {} {:<10} {} {} {}",
            marker,
            outcome.name,
            outcome.url.dimmed(),
            status,
            format!("({} attempt(s))", outcome.attempts).dimmed()
        );
    }
}
