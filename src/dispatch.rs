//! Hierarchical test dispatch.
//!
//! The dispatcher walks each loaded test tree in stored order, consults the
//! [`SkipMap`] at the correct granularity, and registers every surviving
//! (file, section, test) triple as an independently reported unit. Exclusion
//! is resolved strictly top-down: a file-level skip removes the whole file, a
//! section-level skip removes exactly that section, and a test list removes
//! exactly the named tests. A narrower exclusion never widens and a skip in
//! one section never leaks into its siblings.
//!
//! Dispatch is sequential and deterministic: file order as given, then
//! section and test insertion order. Units share only the read-only
//! [`RunConfig`]; a failing unit is recorded and its siblings still run.

use std::fmt;

use crate::corpus::{TestCase, TestFile};
use crate::endpoint::RunConfig;
use crate::executor::TestExecutor;
use crate::skip::{split_remainder, SkipEntry, SkipMap};

/// Explicit three-level identity of one execution unit. Kept structured
/// rather than as a pre-joined string so names containing `/` stay
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitKey {
    pub file: String,
    pub section: String,
    pub test: String,
}

impl UnitKey {
    pub fn new(
        file: impl Into<String>,
        section: impl Into<String>,
        test: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            section: section.into(),
            test: test.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.file, self.section, self.test)
    }
}

/// What a skip directive excluded, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipTarget {
    File { file: String },
    Section { file: String, section: String },
    Test(UnitKey),
}

impl fmt::Display for SkipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipTarget::File { file } => write!(f, "{}", file),
            SkipTarget::Section { file, section } => write!(f, "{}/{}", file, section),
            SkipTarget::Test(key) => write!(f, "{}", key),
        }
    }
}

/// Per-unit result. Skips are visible in the report but are never failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass { key: UnitKey },
    Fail { key: UnitKey, cause: String },
    Skipped { target: SkipTarget, reason: String },
}

/// Walks loaded test trees and runs every non-excluded test through the
/// executor.
pub struct TestDispatcher<'a, C, E> {
    config: &'a RunConfig<C>,
    skips: &'a SkipMap,
    executor: &'a E,
}

impl<'a, C, E: TestExecutor<C>> TestDispatcher<'a, C, E> {
    pub fn new(config: &'a RunConfig<C>, skips: &'a SkipMap, executor: &'a E) -> Self {
        Self {
            config,
            skips,
            executor,
        }
    }

    /// Dispatches every file in order, collecting one outcome per unit plus
    /// one per skipped file/section/test.
    pub fn dispatch_all(&self, files: &[TestFile]) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for file in files {
            self.dispatch_file(file, &mut outcomes);
        }
        outcomes
    }

    /// Dispatches one file, applying its skip entry at the correct
    /// granularity.
    pub fn dispatch_file(&self, file: &TestFile, outcomes: &mut Vec<Outcome>) {
        match self.skips.lookup(&file.name) {
            None => {
                for section in &file.sections {
                    self.run_section(file, &section.name, &section.tests, outcomes);
                }
            }
            Some(SkipEntry::All) => {
                outcomes.push(Outcome::Skipped {
                    target: SkipTarget::File {
                        file: file.name.clone(),
                    },
                    reason: "excluded by skip directive".to_string(),
                });
            }
            Some(SkipEntry::Remainder(remainder)) => {
                // Second stage of the skip parse happens here, now that the
                // file's section/test tree is in hand.
                let skip = split_remainder(remainder);
                for section in &file.sections {
                    if section.name != skip.section {
                        self.run_section(file, &section.name, &section.tests, outcomes);
                        continue;
                    }
                    if skip.tests.is_none() {
                        outcomes.push(Outcome::Skipped {
                            target: SkipTarget::Section {
                                file: file.name.clone(),
                                section: section.name.clone(),
                            },
                            reason: "excluded by skip directive".to_string(),
                        });
                        continue;
                    }
                    for test in &section.tests {
                        let key = UnitKey::new(&file.name, &section.name, &test.name);
                        if skip.excludes_test(&test.name) {
                            outcomes.push(Outcome::Skipped {
                                target: SkipTarget::Test(key),
                                reason: "excluded by skip directive".to_string(),
                            });
                        } else {
                            outcomes.push(self.run_unit(key, test));
                        }
                    }
                }
            }
        }
    }

    fn run_section(
        &self,
        file: &TestFile,
        section: &str,
        tests: &[TestCase],
        outcomes: &mut Vec<Outcome>,
    ) {
        for test in tests {
            let key = UnitKey::new(&file.name, section, &test.name);
            outcomes.push(self.run_unit(key, test));
        }
    }

    /// Runs one registered unit. Executor failures become this unit's
    /// outcome and nothing more.
    fn run_unit(&self, key: UnitKey, test: &TestCase) -> Outcome {
        match self.executor.execute(test, self.config) {
            Ok(()) => Outcome::Pass { key },
            Err(cause) => Outcome::Fail { key, cause },
        }
    }
}
