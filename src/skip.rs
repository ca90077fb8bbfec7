//! The skip-directive mini-language.
//!
//! A skip directive names the files, sections, and individual tests to
//! exclude from a conformance run:
//!
//! ```text
//! entries   := entry (';' entry)*
//! entry     := filename ('/' remainder)?
//! remainder := sectionName ('/' testName (',' testName)*)?
//! ```
//!
//! Parsing is deliberately two-stage. [`SkipMap::parse`] splits the directive
//! into per-file entries and stops there: a remainder is kept as an opaque
//! string because section and test names can only be interpreted against a
//! loaded test tree. [`split_remainder`] performs the second split at
//! dispatch time, when that tree is in hand.

use std::collections::HashMap;

/// Per-file exclusion recorded by the outer parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipEntry {
    /// Exclude the entire file.
    All,
    /// Unparsed `section(/test,test...)?` remainder, decomposed at dispatch
    /// time by [`split_remainder`].
    Remainder(String),
}

/// Mapping from test-file name to its exclusion directive.
///
/// Holds at most one entry per file name. A later entry for the same file
/// replaces the earlier one (last-one-wins); duplicates get a warning but are
/// never an error, matching the tolerant grammar above.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkipMap {
    entries: HashMap<String, SkipEntry>,
}

impl SkipMap {
    /// Parses a skip-directive string.
    ///
    /// Entries are split on `;`, then each entry at its *first* `/`. An entry
    /// with no slash excludes the whole named file. Empty entries are
    /// accepted and record an exclusion for the empty file name, which no
    /// well-formed corpus file can match.
    pub fn parse(directive: &str) -> Self {
        let mut entries = HashMap::new();
        for entry in directive.split(';') {
            let (file, skip) = match entry.find('/') {
                Some(i) => (&entry[..i], SkipEntry::Remainder(entry[i + 1..].to_string())),
                None => (entry, SkipEntry::All),
            };
            if entries.insert(file.to_string(), skip).is_some() {
                eprintln!(
                    "warning: duplicate skip entry for file '{}'; keeping the later one",
                    file
                );
            }
        }
        Self { entries }
    }

    /// Looks up the exclusion directive for a file name, if any.
    pub fn lookup(&self, file: &str) -> Option<&SkipEntry> {
        self.entries.get(file)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Section-level exclusion produced by the dispatch-time split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSkip {
    /// Name of the section the exclusion targets.
    pub section: String,
    /// `None` excludes the whole section; `Some` excludes only the named
    /// tests within it.
    pub tests: Option<Vec<String>>,
}

impl SectionSkip {
    /// Returns true if the named test is excluded by this directive.
    pub fn excludes_test(&self, test: &str) -> bool {
        match &self.tests {
            None => true,
            Some(names) => names.iter().any(|n| n == test),
        }
    }
}

/// Decomposes a [`SkipEntry::Remainder`] at its first `/`.
///
/// No slash means the whole remainder is a section name to exclude entirely.
/// With a slash, the part before it is the target section and the part after
/// is a comma-separated list of test names to exclude within that section.
pub fn split_remainder(remainder: &str) -> SectionSkip {
    match remainder.find('/') {
        None => SectionSkip {
            section: remainder.to_string(),
            tests: None,
        },
        Some(i) => SectionSkip {
            section: remainder[..i].to_string(),
            tests: Some(remainder[i + 1..].split(',').map(str::to_string).collect()),
        },
    }
}
