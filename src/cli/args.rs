//! Defines the command-line arguments for the Verdict driver.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "verdict",
    version,
    about = "A conformance-test driver for staged expression-evaluation pipelines."
)]
pub struct VerdictArgs {
    /// Path to the server binary used for any phase without a specific
    /// override.
    #[arg(long)]
    pub server: Option<String>,

    /// Path to the binary serving the parse phase.
    #[arg(long)]
    pub parse_server: Option<String>,

    /// Path to the binary serving the check phase.
    #[arg(long)]
    pub check_server: Option<String>,

    /// Path to the binary serving the eval phase.
    #[arg(long)]
    pub eval_server: Option<String>,

    /// Tests to skip, in the format `file(/section(/test(,test)*)?)?`,
    /// entries separated by `;`.
    #[arg(long)]
    pub skip_test: Option<String>,

    /// Test-definition files, or directories to scan for them.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
