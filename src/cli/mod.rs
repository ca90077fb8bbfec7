//! The Verdict command-line interface.
//!
//! Orchestrates one conformance run: resolve the phase endpoints, parse the
//! skip directive, load the corpus, dispatch, report. Configuration lives in
//! explicit values built here from the parsed arguments; nothing reads
//! ambient global state.

use crate::cli::args::VerdictArgs;
use crate::corpus;
use crate::dispatch::TestDispatcher;
use crate::endpoint::EndpointPaths;
use crate::executor::PipelineExecutor;
use crate::report::{report_outcomes, ReportStyle, RunSummary};
use crate::skip::SkipMap;

pub mod args;

/// Runs one full conformance pass and returns its summary.
///
/// Configuration and decode errors abort before (or mid-) dispatch with a
/// diagnostic; individual test failures only show up in the summary counts.
pub fn run(args: &VerdictArgs) -> miette::Result<RunSummary> {
    let endpoints = EndpointPaths {
        default: args.server.clone(),
        parse: args.parse_server.clone(),
        check: args.check_server.clone(),
        eval: args.eval_server.clone(),
    };
    let config = endpoints.resolve()?;

    let skips = match args.skip_test.as_deref() {
        Some(directive) => SkipMap::parse(directive),
        None => SkipMap::default(),
    };

    let mut files = Vec::new();
    for path in corpus::collect_corpus_paths(&args.files)? {
        files.push(corpus::load_test_file(&path)?);
    }

    let executor = PipelineExecutor;
    let dispatcher = TestDispatcher::new(&config, &skips, &executor);
    let outcomes = dispatcher.dispatch_all(&files);

    Ok(report_outcomes(&outcomes, &ReportStyle::default()))
}
