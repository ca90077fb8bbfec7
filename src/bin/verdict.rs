// Verdict conformance driver entry point.
// Usage: verdict --server=<path-to-binary> [--skip-test=...] testfile1 ...

use clap::Parser;
use std::process;
use verdict::cli::{self, args::VerdictArgs};

fn main() -> miette::Result<()> {
    let args = VerdictArgs::parse();
    let summary = cli::run(&args)?;
    if summary.failed > 0 {
        process::exit(1);
    }
    Ok(())
}
