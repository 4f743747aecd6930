//! Section sizes from a `readelf -S` style listing.

use crate::error::{self, FileError};
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::{fmt, path::Path, sync::LazyLock};

/// Sections summed into the RAM footprint of the default image layout.
pub const DEFAULT_TARGETS: [&str; 9] = [
    ".ramVectors",
    ".appTextRam",
    ".data",
    ".noinit",
    ".bss",
    ".bootstrapText",
    ".bootstrapze[...]",
    ".bootstrapData",
    ".bootstrapBss",
];

// [Nr] Name Type Addr Off Size ...
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*\d+\]\s+(\S+)\s+\S+\s+[0-9a-fA-F]+\s+[0-9a-fA-F]+\s+([0-9a-fA-F]+)").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSize {
    /// Size column exactly as printed, without a `0x` prefix.
    pub hex: String,
    #[serde(rename = "int")]
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub name: String,
    pub size: Option<SectionSize>,
}

/// One entry per target section, in the order the targets were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub sections: Vec<SectionEntry>,
}

impl SectionReport {
    pub fn new<S: AsRef<str>>(targets: &[S]) -> SectionReport {
        let mut sections: Vec<SectionEntry> = Vec::with_capacity(targets.len());
        for name in targets {
            let name = name.as_ref();
            if !sections.iter().any(|s| s.name == name) {
                sections.push(SectionEntry {
                    name: name.to_string(),
                    size: None,
                });
            }
        }
        SectionReport { sections }
    }

    pub fn get(&self, name: &str) -> Option<&SectionSize> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.size.as_ref())
    }

    pub fn is_target(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    /// Stores `size` for `name` if it is a target. A later call for the same
    /// name replaces the earlier size.
    pub fn record(&mut self, name: &str, size: SectionSize) {
        if let Some(entry) = self.sections.iter_mut().find(|s| s.name == name) {
            entry.size = Some(size);
        }
    }

    pub fn found(&self) -> usize {
        self.sections.iter().filter(|s| s.size.is_some()).count()
    }

    /// Sum of every section that was found, `None` if it does not fit a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.sections
            .iter()
            .filter_map(|s| s.size.as_ref())
            .try_fold(0u64, |acc, s| acc.checked_add(s.bytes))
    }
}

impl fmt::Display for SectionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:<15} | {:<10} | {}", "Section Name", "Size (Hex)", "Size (Bytes)")?;
        writeln!(f, "{}", "-".repeat(45))?;
        for entry in &self.sections {
            match &entry.size {
                Some(size) => {
                    writeln!(f, "{:<15} | 0x{:<8} | {}", entry.name, size.hex, size.bytes)?
                }
                None => writeln!(f, "{:<15} | {:<10} | -", entry.name, "Not Found")?,
            }
        }
        Ok(())
    }
}

/// Pulls the name and size columns out of one section header row.
pub fn parse_section_line(line: &str) -> Option<(&str, &str)> {
    let caps = SECTION_HEADER.captures(line)?;
    let name = caps.get(1)?.as_str();
    let size = caps.get(2)?.as_str();
    Some((name, size))
}

pub fn extract_section_sizes<S: AsRef<str>>(text: &str, targets: &[S]) -> SectionReport {
    let mut report = SectionReport::new(targets);

    for line in text.lines() {
        let Some((name, hex)) = parse_section_line(line) else {
            continue;
        };
        if !report.is_target(name) {
            continue;
        }

        let bytes = match u64::from_str_radix(hex, 16) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("ignoring size {} of section {}: {}", hex, name, e);
                continue;
            }
        };
        debug!("section {} has size 0x{} ({} bytes)", name, hex, bytes);
        report.record(
            name,
            SectionSize {
                hex: hex.to_string(),
                bytes,
            },
        );
    }

    report
}

/// Reads a section listing from disk. A file that cannot be read yields no
/// report at all rather than a partial one.
pub fn parse_section_sizes<S: AsRef<str>>(
    path: &Path,
    targets: &[S],
) -> Result<SectionReport, FileError> {
    let text = error::read_text(path)?;
    Ok(extract_section_sizes(&text, targets))
}

pub fn file_size(path: &Path) -> Result<u64, FileError> {
    std::fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|e| FileError::from_io(path, e))
}
