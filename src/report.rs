//! Outcome reporting and run summary.

use crate::dispatch::Outcome;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Controls terminal styling for the report.
pub struct ReportStyle {
    pub use_colors: bool,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

impl ReportStyle {
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Pass/fail/skip counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Counts outcomes by kind.
pub fn summarize(outcomes: &[Outcome]) -> RunSummary {
    RunSummary {
        passed: outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Pass { .. }))
            .count(),
        failed: outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Fail { .. }))
            .count(),
        skipped: outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Skipped { .. }))
            .count(),
    }
}

/// Prints one line per outcome, a summary, and the failing units again at the
/// end so they are visible after a long run.
pub fn report_outcomes(outcomes: &[Outcome], style: &ReportStyle) -> RunSummary {
    for outcome in outcomes {
        match outcome {
            Outcome::Pass { key } => {
                println!("{}: {}", style.colorize("PASS", GREEN), key);
            }
            Outcome::Fail { key, cause } => {
                eprintln!("{}: {}", style.colorize("FAIL", RED), key);
                eprintln!("  {}", cause.replace('\n', "\n  "));
            }
            Outcome::Skipped { target, reason } => {
                println!("{}: {} ({})", style.colorize("SKIP", YELLOW), target, reason);
            }
        }
    }

    let summary = summarize(outcomes);
    println!(
        "\nConformance summary: total {}, {} {}, {} {}, {} {}",
        summary.total(),
        style.colorize("passed", GREEN),
        summary.passed,
        style.colorize("failed", RED),
        summary.failed,
        style.colorize("skipped", YELLOW),
        summary.skipped,
    );

    if summary.failed > 0 {
        eprintln!("\nFailed units:");
        for outcome in outcomes {
            if let Outcome::Fail { key, .. } = outcome {
                eprintln!("  - {}", key);
            }
        }
    }

    summary
}
