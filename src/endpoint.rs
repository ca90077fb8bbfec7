//! Phase endpoint resolution and the run configuration.
//!
//! A run needs a backing server for each of the three pipeline phases. Paths
//! come from the CLI as one optional default plus one optional override per
//! phase; the override wins, and a phase with neither is a fatal
//! configuration error. Identical resolved paths share a single client so
//! that each distinct binary is launched exactly once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::client::PhaseClient;
use crate::errors::DriverError;

/// One of the three pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Parse,
    Check,
    Eval,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Parse, Phase::Check, Phase::Eval];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Parse => "parse",
            Phase::Check => "check",
            Phase::Eval => "eval",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Server binary paths as configured at startup, before resolution.
///
/// Built once from the CLI and passed by reference; the driver keeps no
/// ambient global configuration.
#[derive(Debug, Clone, Default)]
pub struct EndpointPaths {
    /// Fallback path for any phase without a specific override.
    pub default: Option<String>,
    pub parse: Option<String>,
    pub check: Option<String>,
    pub eval: Option<String>,
}

impl EndpointPaths {
    /// Effective path for one phase: override-if-present-else-default.
    fn effective(&self, phase: Phase) -> Result<&str, DriverError> {
        let specific = match phase {
            Phase::Parse => &self.parse,
            Phase::Check => &self.check,
            Phase::Eval => &self.eval,
        };
        specific
            .as_deref()
            .or(self.default.as_deref())
            .ok_or(DriverError::NoServer { phase })
    }

    /// Resolves all three phases and launches one [`PhaseClient`] per
    /// distinct path. Any launch failure aborts the run before dispatch.
    pub fn resolve(&self) -> Result<RunConfig<PhaseClient>, DriverError> {
        self.resolve_with(PhaseClient::from_path)
    }

    /// Resolution with an injected client constructor.
    ///
    /// Phases whose effective paths are equal receive the *identical*
    /// `Arc`-shared client instance, so phase-specific launch work happens
    /// once per distinct binary.
    pub fn resolve_with<C, F>(&self, mut connect: F) -> Result<RunConfig<C>, DriverError>
    where
        F: FnMut(&str) -> Result<C, DriverError>,
    {
        let parse_path = self.effective(Phase::Parse)?;
        let check_path = self.effective(Phase::Check)?;
        let eval_path = self.effective(Phase::Eval)?;

        let mut clients: HashMap<&str, Arc<C>> = HashMap::new();
        for path in [parse_path, check_path, eval_path] {
            if !clients.contains_key(path) {
                clients.insert(path, Arc::new(connect(path)?));
            }
        }

        Ok(RunConfig {
            parse: Arc::clone(&clients[parse_path]),
            check: Arc::clone(&clients[check_path]),
            eval: Arc::clone(&clients[eval_path]),
        })
    }
}

/// The three resolved phase-client handles for one run.
///
/// Built once per invocation and shared read-only by every dispatched unit.
/// Generic over the client type so dispatch and executor logic can be tested
/// without launching server processes.
#[derive(Debug)]
pub struct RunConfig<C> {
    pub parse: Arc<C>,
    pub check: Arc<C>,
    pub eval: Arc<C>,
}

impl<C> RunConfig<C> {
    /// The client handle backing the given phase.
    pub fn client(&self, phase: Phase) -> &Arc<C> {
        match phase {
            Phase::Parse => &self.parse,
            Phase::Check => &self.check,
            Phase::Eval => &self.eval,
        }
    }
}
