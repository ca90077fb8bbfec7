//! Verdict error handling.
//!
//! Only run-fatal conditions live here: configuration problems discovered
//! before dispatch, corpus files that cannot be decoded, and phase-wire
//! failures. A test that fails inside the executor is *not* a `DriverError`;
//! it is converted to a failing [`Outcome`](crate::dispatch::Outcome) at the
//! unit boundary and never aborts sibling dispatch.

use miette::Diagnostic;
use thiserror::Error;

use crate::endpoint::Phase;

/// Run-fatal errors surfaced by the driver.
#[derive(Debug, Error, Diagnostic)]
pub enum DriverError {
    /// A phase had neither a specific server path nor a default one.
    #[error("no server defined for {phase} phase")]
    #[diagnostic(
        code(verdict::config::no_server),
        help("pass --server or --{phase}-server")
    )]
    NoServer { phase: Phase },

    /// A resolved server binary could not be launched.
    #[error("can't launch phase server '{path}'")]
    #[diagnostic(code(verdict::config::launch))]
    Launch {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A test-definition file could not be read.
    #[error("can't read test file '{path}'")]
    #[diagnostic(code(verdict::corpus::read))]
    CorpusRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A test-definition file could not be decoded.
    #[error("can't parse test file '{path}'")]
    #[diagnostic(code(verdict::corpus::decode))]
    CorpusDecode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The wire exchange with a phase server broke down.
    #[error("{phase} phase transport failed: {message}")]
    #[diagnostic(code(verdict::client::transport))]
    Transport { phase: Phase, message: String },
}
