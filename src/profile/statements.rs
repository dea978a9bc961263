//! Statement profile reader.
//!
//! Parses the block-oriented profile written by `go test -coverprofile` into
//! per-package, per-file statement totals:
//!
//! ```text
//! mode: set
//! github.com/acme/project/cover.go:17.80,21.25 3 1
//! github.com/acme/project/cover.go:21.25,23.3 1 0
//! ```

use super::paths::{package_of, RootTrim};
use crate::coverage::percent;
use crate::errors::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::LazyLock;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$")
        .expect("block pattern is valid")
});

/// Statement totals for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatements {
    pub stmts: u64,
    pub covered_stmts: u64,
    /// Rounded percentage of `covered_stmts` over `stmts`.
    pub percent: f64,
}

impl FileStatements {
    pub fn new(stmts: u64, covered_stmts: u64) -> Self {
        Self {
            stmts,
            covered_stmts,
            percent: percent(covered_stmts, stmts),
        }
    }
}

/// Statement totals for one package, keyed by (trimmed) file path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStatements {
    pub package: String,
    pub files: HashMap<String, FileStatements>,
    /// Sum of `stmts` over `files`.
    pub stmts: u64,
    /// Sum of `covered_stmts` over `files`.
    pub covered_stmts: u64,
}

impl PackageStatements {
    /// Build a package record, deriving the package totals from its files.
    pub fn from_files(
        package: impl Into<String>,
        files: HashMap<String, FileStatements>,
    ) -> Self {
        let (stmts, covered_stmts) = files.values().fold((0u64, 0u64), |(s, c), f| {
            (s.saturating_add(f.stmts), c.saturating_add(f.covered_stmts))
        });
        Self {
            package: package.into(),
            files,
            stmts,
            covered_stmts,
        }
    }
}

/// Source of statement-side coverage data.
pub trait StatementReader: Send + Sync {
    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<PackageStatements>>;
}

/// Counting mode declared on the first line of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Set,
    Count,
    Atomic,
}

impl ProfileMode {
    fn parse(line: &str) -> Option<Self> {
        match line.strip_prefix("mode:")?.trim() {
            "set" => Some(Self::Set),
            "count" => Some(Self::Count),
            "atomic" => Some(Self::Atomic),
            _ => None,
        }
    }

    fn merge(self, existing: u64, incoming: u64) -> u64 {
        match self {
            Self::Set => u64::from(existing > 0 || incoming > 0),
            Self::Count | Self::Atomic => existing.saturating_add(incoming),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BlockPos {
    start_line: u32,
    start_col: u32,
    end_line: u32,
    end_col: u32,
}

#[derive(Debug, Clone, Copy)]
struct Block {
    num_stmts: u64,
    count: u64,
}

/// Reader for `go test -coverprofile` output.
#[derive(Debug, Clone, Default)]
pub struct GoCoverProfileReader {
    trim: RootTrim,
}

impl GoCoverProfileReader {
    pub fn new(trim: RootTrim) -> Self {
        Self { trim }
    }
}

impl StatementReader for GoCoverProfileReader {
    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<PackageStatements>> {
        let blocks = read_blocks(input)?;
        Ok(group_by_package(&blocks, &self.trim))
    }
}

fn read_blocks(input: &mut dyn BufRead) -> Result<HashMap<String, HashMap<BlockPos, Block>>> {
    let mut mode: Option<ProfileMode> = None;
    let mut files: HashMap<String, HashMap<BlockPos, Block>> = HashMap::new();
    // Every file and package total is bounded by this sum.
    let mut total_stmts: u64 = 0;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(current) = mode else {
            let parsed = ProfileMode::parse(line).ok_or_else(|| {
                Error::parse(line_no, format!("expected mode line, found {:?}", line))
            })?;
            mode = Some(parsed);
            continue;
        };

        // Concatenated profiles repeat their mode line.
        if line.starts_with("mode:") {
            match ProfileMode::parse(line) {
                Some(m) if m == current => continue,
                _ => return Err(Error::parse(line_no, format!("conflicting mode line {:?}", line))),
            }
        }

        let (file, pos, block) = parse_block(line, line_no)?;
        let file_blocks = files.entry(file.to_string()).or_default();
        match file_blocks.get_mut(&pos) {
            Some(existing) => {
                if existing.num_stmts != block.num_stmts {
                    return Err(Error::parse(
                        line_no,
                        format!(
                            "inconsistent statement count for {}: {} vs {}",
                            file, existing.num_stmts, block.num_stmts
                        ),
                    ));
                }
                existing.count = current.merge(existing.count, block.count);
            }
            None => {
                total_stmts = total_stmts
                    .checked_add(block.num_stmts)
                    .ok_or_else(|| Error::parse(line_no, "statement count overflow"))?;
                file_blocks.insert(pos, block);
            }
        }
    }

    log::debug!("Read cover profile blocks for {} files", files.len());
    Ok(files)
}

fn parse_block(line: &str, line_no: usize) -> Result<(&str, BlockPos, Block)> {
    let caps = BLOCK_RE
        .captures(line)
        .ok_or_else(|| Error::parse(line_no, format!("line {:?} doesn't match expected format", line)))?;

    let number = |i: usize| -> Result<u64> {
        caps[i]
            .parse::<u64>()
            .map_err(|e| Error::parse(line_no, format!("invalid number {:?}: {}", &caps[i], e)))
    };
    let position = |i: usize| -> Result<u32> {
        caps[i]
            .parse::<u32>()
            .map_err(|e| Error::parse(line_no, format!("invalid position {:?}: {}", &caps[i], e)))
    };

    let pos = BlockPos {
        start_line: position(2)?,
        start_col: position(3)?,
        end_line: position(4)?,
        end_col: position(5)?,
    };
    let block = Block {
        num_stmts: number(6)?,
        count: number(7)?,
    };
    let file = caps.get(1).map_or("", |m| m.as_str());
    Ok((file, pos, block))
}

fn group_by_package(
    files: &HashMap<String, HashMap<BlockPos, Block>>,
    trim: &RootTrim,
) -> Vec<PackageStatements> {
    let mut packages: HashMap<&str, HashMap<String, FileStatements>> = HashMap::new();

    for (file, blocks) in files {
        let (stmts, covered) = blocks.values().fold((0u64, 0u64), |(s, c), b| {
            let hit = if b.count > 0 { b.num_stmts } else { 0 };
            (s.saturating_add(b.num_stmts), c.saturating_add(hit))
        });
        packages
            .entry(package_of(file))
            .or_default()
            .insert(trim.trim(file).to_string(), FileStatements::new(stmts, covered));
    }

    packages
        .into_iter()
        .map(|(package, files)| PackageStatements::from_files(package, files))
        .collect()
}
