// Skip granularity, ordering, and unit independence for the test dispatcher.

use std::cell::RefCell;

use verdict::corpus::{parse_test_file, TestCase, TestFile};
use verdict::dispatch::{Outcome, SkipTarget, TestDispatcher, UnitKey};
use verdict::endpoint::{EndpointPaths, RunConfig};
use verdict::executor::TestExecutor;
use verdict::skip::SkipMap;

/// Executor double: records every unit it is asked to run and fails the
/// tests whose names are listed in `fail`.
#[derive(Default)]
struct RecordingExecutor {
    ran: RefCell<Vec<String>>,
    fail: Vec<String>,
}

impl TestExecutor<()> for RecordingExecutor {
    fn execute(&self, case: &TestCase, _config: &RunConfig<()>) -> Result<(), String> {
        self.ran.borrow_mut().push(case.expr.clone());
        if self.fail.contains(&case.name) {
            Err(format!("forced failure for {}", case.name))
        } else {
            Ok(())
        }
    }
}

fn dummy_config() -> RunConfig<()> {
    EndpointPaths {
        default: Some("unused".to_string()),
        ..Default::default()
    }
    .resolve_with(|_| Ok(()))
    .unwrap()
}

/// Two files, three sections, five tests. Each test's `expr` is its full
/// path so the recording executor can observe dispatch order.
fn corpus() -> Vec<TestFile> {
    let f1 = parse_test_file(
        r#"
name: f1
sections:
  - name: sA
    tests:
      - name: t1
        expr: "f1/sA/t1"
      - name: t2
        expr: "f1/sA/t2"
      - name: t3
        expr: "f1/sA/t3"
  - name: sB
    tests:
      - name: t1
        expr: "f1/sB/t1"
"#,
        "f1.yaml",
    )
    .unwrap();
    let f2 = parse_test_file(
        r#"
name: f2
sections:
  - name: sA
    tests:
      - name: t1
        expr: "f2/sA/t1"
"#,
        "f2.yaml",
    )
    .unwrap();
    vec![f1, f2]
}

fn dispatch(skip: &str, executor: &RecordingExecutor) -> Vec<Outcome> {
    let config = dummy_config();
    let skips = SkipMap::parse(skip);
    TestDispatcher::new(&config, &skips, executor).dispatch_all(&corpus())
}

fn ran(executor: &RecordingExecutor) -> Vec<String> {
    executor.ran.borrow().clone()
}

#[test]
fn no_skip_entry_runs_everything_in_stored_order() {
    let executor = RecordingExecutor::default();
    let config = dummy_config();
    let skips = SkipMap::default();
    let outcomes = TestDispatcher::new(&config, &skips, &executor).dispatch_all(&corpus());

    assert_eq!(
        ran(&executor),
        ["f1/sA/t1", "f1/sA/t2", "f1/sA/t3", "f1/sB/t1", "f2/sA/t1"]
    );
    assert!(outcomes.iter().all(|o| matches!(o, Outcome::Pass { .. })));
}

#[test]
fn file_level_skip_excludes_the_whole_file_only() {
    let executor = RecordingExecutor::default();
    let outcomes = dispatch("f1", &executor);

    assert_eq!(ran(&executor), ["f2/sA/t1"]);
    assert!(outcomes.contains(&Outcome::Skipped {
        target: SkipTarget::File {
            file: "f1".to_string()
        },
        reason: "excluded by skip directive".to_string(),
    }));
}

#[test]
fn section_level_skip_spares_sibling_sections() {
    let executor = RecordingExecutor::default();
    let outcomes = dispatch("f1/sA", &executor);

    assert_eq!(ran(&executor), ["f1/sB/t1", "f2/sA/t1"]);
    assert!(outcomes.contains(&Outcome::Skipped {
        target: SkipTarget::Section {
            file: "f1".to_string(),
            section: "sA".to_string()
        },
        reason: "excluded by skip directive".to_string(),
    }));
}

#[test]
fn test_level_skip_excludes_exactly_the_named_tests() {
    let executor = RecordingExecutor::default();
    let outcomes = dispatch("f1/sA/t1,t3", &executor);

    assert_eq!(ran(&executor), ["f1/sA/t2", "f1/sB/t1", "f2/sA/t1"]);
    let skipped: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            Outcome::Skipped {
                target: SkipTarget::Test(key),
                ..
            } => Some(key.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, ["f1/sA/t1", "f1/sA/t3"]);
}

#[test]
fn section_skip_in_one_file_does_not_leak_into_another() {
    let executor = RecordingExecutor::default();
    dispatch("f2/sA", &executor);
    // f1 has a section with the same name; it must still run.
    assert_eq!(
        ran(&executor),
        ["f1/sA/t1", "f1/sA/t2", "f1/sA/t3", "f1/sB/t1"]
    );
}

#[test]
fn duplicate_skip_entries_keep_only_the_last() {
    let executor = RecordingExecutor::default();
    dispatch("f1/sA;f1/sB", &executor);
    // sA runs, sB is the effective exclusion target.
    assert_eq!(
        ran(&executor),
        ["f1/sA/t1", "f1/sA/t2", "f1/sA/t3", "f2/sA/t1"]
    );
}

#[test]
fn a_failing_unit_does_not_stop_its_siblings() {
    let executor = RecordingExecutor {
        ran: RefCell::new(Vec::new()),
        fail: vec!["t1".to_string()],
    };
    let outcomes = dispatch("", &executor);

    // Every test still ran, including those after the failures.
    assert_eq!(
        ran(&executor),
        ["f1/sA/t1", "f1/sA/t2", "f1/sA/t3", "f1/sB/t1", "f2/sA/t1"]
    );
    let failed: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            Outcome::Fail { key, cause } => {
                assert!(cause.contains("forced failure"));
                Some(key.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        failed,
        [
            UnitKey::new("f1", "sA", "t1"),
            UnitKey::new("f1", "sB", "t1"),
            UnitKey::new("f2", "sA", "t1"),
        ]
    );
}

#[test]
fn dispatch_order_is_stable_across_runs() {
    let first = RecordingExecutor::default();
    let second = RecordingExecutor::default();
    dispatch("f1/sA/t2", &first);
    dispatch("f1/sA/t2", &second);
    assert_eq!(ran(&first), ran(&second));
}
