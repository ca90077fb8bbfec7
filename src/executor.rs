//! Single-test execution against the three phase servers.
//!
//! The dispatcher sees only the [`TestExecutor`] contract: one call per
//! included test, returning success or a descriptive failure. The default
//! [`PipelineExecutor`] drives parse → check → eval through the run's phase
//! clients and judges the outcome against the case's expectation. It neither
//! retries nor times out; that discipline belongs to the transport.

use serde_json::{json, Value};

use crate::client::{PhaseInvoker, PhaseRequest};
use crate::corpus::TestCase;
use crate::endpoint::{Phase, RunConfig};

/// Contract between the dispatcher and whatever actually runs one test.
/// Failures are descriptive strings; the dispatcher records them against the
/// unit and moves on.
pub trait TestExecutor<C> {
    fn execute(&self, case: &TestCase, config: &RunConfig<C>) -> Result<(), String>;
}

/// Staged execution: each phase's result feeds the next, and any phase may
/// report the failure an error test expects.
#[derive(Debug, Default)]
pub struct PipelineExecutor;

/// What one phase call produced: a value to feed forward, or the phase's own
/// reported failure.
enum PhaseOutcome {
    Value(Value),
    Failed(String),
}

impl PipelineExecutor {
    fn call<C: PhaseInvoker>(
        client: &C,
        phase: Phase,
        payload: Value,
    ) -> Result<PhaseOutcome, String> {
        let response = client
            .invoke(&PhaseRequest { phase, payload })
            .map_err(|e| e.to_string())?;
        match (response.result, response.error) {
            (_, Some(error)) => Ok(PhaseOutcome::Failed(format!("{}: {}", phase, error))),
            (Some(value), None) => Ok(PhaseOutcome::Value(value)),
            (None, None) => Err(format!("{} phase returned neither result nor error", phase)),
        }
    }

    fn judge_failure(case: &TestCase, failure: String) -> Result<(), String> {
        match case.expect_error.as_deref() {
            Some(expected) if failure.contains(expected) => Ok(()),
            Some(expected) => Err(format!(
                "expected error containing {:?}, got: {}",
                expected, failure
            )),
            None => Err(failure),
        }
    }

    fn judge_value(case: &TestCase, value: Value) -> Result<(), String> {
        if let Some(expected) = case.expect_error.as_deref() {
            return Err(format!(
                "expected error containing {:?}, but evaluation succeeded with {}",
                expected, value
            ));
        }
        match &case.expected {
            None => Ok(()),
            Some(expected) => {
                let expected = serde_json::to_value(expected)
                    .map_err(|e| format!("unrepresentable expected value: {}", e))?;
                if value == expected {
                    Ok(())
                } else {
                    Err(format!(
                        "result mismatch\n  expected: {}\n  actual:   {}",
                        expected, value
                    ))
                }
            }
        }
    }
}

impl<C: PhaseInvoker> TestExecutor<C> for PipelineExecutor {
    fn execute(&self, case: &TestCase, config: &RunConfig<C>) -> Result<(), String> {
        let bindings = serde_json::to_value(&case.bindings)
            .map_err(|e| format!("unrepresentable bindings: {}", e))?;

        let ast = match Self::call(
            config.parse.as_ref(),
            Phase::Parse,
            json!({ "expr": case.expr }),
        )? {
            PhaseOutcome::Value(ast) => ast,
            PhaseOutcome::Failed(failure) => return Self::judge_failure(case, failure),
        };

        let checked = match Self::call(config.check.as_ref(), Phase::Check, json!({ "ast": ast }))?
        {
            PhaseOutcome::Value(checked) => checked,
            PhaseOutcome::Failed(failure) => return Self::judge_failure(case, failure),
        };

        match Self::call(
            config.eval.as_ref(),
            Phase::Eval,
            json!({ "ast": checked, "bindings": bindings }),
        )? {
            PhaseOutcome::Value(value) => Self::judge_value(case, value),
            PhaseOutcome::Failed(failure) => Self::judge_failure(case, failure),
        }
    }
}
