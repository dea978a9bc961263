//! Reconstruct the package → test → subtest tree from test events.
//!
//! A node's outcome comes only from its own terminal event. Parents are not
//! rolled up from their children, so a test that never reported (panic,
//! timeout) stays [`Outcome::Unknown`].

use super::events::{Action, TestEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    #[default]
    Unknown,
}

impl Outcome {
    fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Pass => Some(Self::Passed),
            Action::Fail => Some(Self::Failed),
            Action::Skip => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// A single test or subtest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Last path segment, e.g. `case_1` for `TestParse/case_1`.
    pub name: String,
    pub full_name: String,
    pub package: String,
    pub outcome: Outcome,
    pub elapsed: f64,
    pub output: Vec<String>,
    pub subtests: Vec<Test>,
}

impl Test {
    fn new(package: &str, full_name: &str) -> Self {
        let name = full_name.rsplit('/').next().unwrap_or(full_name);
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            package: package.to_string(),
            ..Default::default()
        }
    }

    fn collect_failed<'a>(&'a self, out: &mut Vec<&'a Test>) {
        if self.outcome == Outcome::Failed {
            out.push(self);
        }
        for sub in &self.subtests {
            sub.collect_failed(out);
        }
    }

    fn tally(&self, counts: &mut TestCounts) {
        counts.record(self.outcome);
        for sub in &self.subtests {
            sub.tally(counts);
        }
    }
}

/// Results for one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRun {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: f64,
    pub tests: Vec<Test>,
}

impl PackageRun {
    /// Look up a test by its full `/`-separated name.
    pub fn test(&self, full_name: &str) -> Option<&Test> {
        let mut segments = full_name.split('/');
        let first = segments.next()?;
        let mut node = self.tests.iter().find(|t| t.name == first)?;
        for segment in segments {
            node = node.subtests.iter().find(|t| t.name == segment)?;
        }
        Some(node)
    }

    pub fn count(&self) -> TestCounts {
        let mut counts = TestCounts::default();
        for test in &self.tests {
            test.tally(&mut counts);
        }
        counts
    }

    fn node_mut(&mut self, full_name: &str) -> &mut Test {
        let mut siblings = &mut self.tests;
        let mut end = 0;
        let mut nodes = full_name.split('/').peekable();
        loop {
            let segment = nodes.next().unwrap_or_default();
            end += segment.len();
            let idx = match siblings.iter().position(|t| t.name == segment) {
                Some(idx) => idx,
                None => {
                    siblings.push(Test::new(&self.name, &full_name[..end]));
                    siblings.len() - 1
                }
            };
            if nodes.peek().is_none() {
                return &mut siblings[idx];
            }
            end += 1;
            siblings = &mut siblings[idx].subtests;
        }
    }
}

/// Per-outcome totals over all tests and subtests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unknown: usize,
}

impl TestCounts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.unknown
    }
}

/// A whole `go test` invocation, packages in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub packages: Vec<PackageRun>,
}

impl TestRun {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a TestEvent>) -> Self {
        let mut run = TestRun::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for event in events {
            let slot = *index.entry(event.package.clone()).or_insert_with(|| {
                run.packages.push(PackageRun {
                    name: event.package.clone(),
                    ..Default::default()
                });
                run.packages.len() - 1
            });
            apply(&mut run.packages[slot], event);
        }

        run
    }

    pub fn package(&self, name: &str) -> Option<&PackageRun> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Every failed test or subtest, depth-first.
    pub fn failed(&self) -> Vec<&Test> {
        let mut out = Vec::new();
        for test in self.packages.iter().flat_map(|p| &p.tests) {
            test.collect_failed(&mut out);
        }
        out
    }

    pub fn count(&self) -> TestCounts {
        self.packages.iter().fold(TestCounts::default(), |acc, p| {
            let c = p.count();
            TestCounts {
                passed: acc.passed + c.passed,
                failed: acc.failed + c.failed,
                skipped: acc.skipped + c.skipped,
                unknown: acc.unknown + c.unknown,
            }
        })
    }

    pub fn passed(&self) -> bool {
        self.packages.iter().all(|p| p.outcome != Outcome::Failed) && self.failed().is_empty()
    }
}

fn apply(pkg: &mut PackageRun, event: &TestEvent) {
    let outcome = Outcome::from_action(event.action);

    let Some(name) = event.test.as_deref().filter(|n| !n.is_empty()) else {
        if let Some(outcome) = outcome {
            pkg.outcome = outcome;
            pkg.elapsed = event.elapsed.unwrap_or_default();
        }
        return;
    };

    match (event.action, outcome) {
        (_, Some(outcome)) => {
            let test = pkg.node_mut(name);
            test.outcome = outcome;
            test.elapsed = event.elapsed.unwrap_or_default();
        }
        (Action::Run, None) => {
            pkg.node_mut(name);
        }
        (Action::Output, None) => {
            if let Some(text) = event.output.as_deref() {
                let line = text.strip_suffix('\n').unwrap_or(text);
                pkg.node_mut(name).output.push(line.to_string());
            }
        }
        _ => {}
    }
}
