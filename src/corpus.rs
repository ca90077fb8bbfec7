//! Loading the declarative test corpus.
//!
//! A corpus file is a YAML document describing one [`TestFile`]: a named,
//! ordered tree of sections and tests. The tree is immutable once loaded and
//! the driver never interprets a test's payload; the expression, bindings,
//! and expectation pass through untouched to the executor.
//!
//! ```yaml
//! name: basic
//! sections:
//!   - name: self_eval
//!     tests:
//!       - name: int
//!         expr: "42"
//!         expected: 42
//!       - name: bad_syntax
//!         expr: "(1 +"
//!         expect_error: "syntax"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::errors::DriverError;

/// One loaded test-definition file: a name unique within the run and its
/// ordered sections.
#[derive(Debug, Clone, Deserialize)]
pub struct TestFile {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A named, ordered group of tests within a file.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// One test definition. Everything but `name` is opaque payload for the
/// executor.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub expr: String,
    #[serde(default)]
    pub bindings: BTreeMap<String, serde_yaml::Value>,
    /// Expected evaluation result for a success test.
    pub expected: Option<serde_yaml::Value>,
    /// Substring expected in the failure for an error test.
    pub expect_error: Option<String>,
}

/// Decodes a corpus document from source text. `label` names the origin for
/// error reporting.
pub fn parse_test_file(source: &str, label: &str) -> Result<TestFile, DriverError> {
    serde_yaml::from_str(source).map_err(|e| DriverError::CorpusDecode {
        path: label.to_string(),
        source: e,
    })
}

/// Reads and decodes one corpus file. A decode failure is fatal for the run;
/// there is no fallback test content.
pub fn load_test_file(path: &Path) -> Result<TestFile, DriverError> {
    let display = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|e| DriverError::CorpusRead {
        path: display.clone(),
        source: e,
    })?;
    parse_test_file(&source, &display)
}

/// Expands the positional arguments into concrete corpus file paths.
///
/// A path naming a directory is walked recursively for `.yaml`/`.yml` files,
/// sorted for deterministic execution order. Plain file paths are kept as-is,
/// in the order given.
pub fn collect_corpus_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, DriverError> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file()
                    && e.path()
                        .extension()
                        .map(|ext| ext == "yaml" || ext == "yml")
                        .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        found.sort();
        paths.extend(found);
    }
    Ok(paths)
}
