//! Strips comments from every C/C++ source below a directory, in place.

use crate::error::{self, FileError};
use crate::preprocess::remove_comments;
use anyhow::{Result, bail};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::{
    ffi::OsString,
    fmt, fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: [&str; 8] = ["c", "cpp", "cc", "cxx", "h", "hpp", "hxx", "ipp"];

pub const BACKUP_SUFFIX: &str = ".backup";

/// File extensions treated as sources, stored lowercase without the dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions(Vec<String>);

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl Extensions {
    pub fn new<S: AsRef<str>>(exts: &[S]) -> Extensions {
        let mut normalized: Vec<String> = Vec::with_capacity(exts.len());
        for ext in exts {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Extensions(normalized)
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.contains(&ext.to_ascii_lowercase()))
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions::new(&DEFAULT_EXTENSIONS)
    }
}

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub extensions: Extensions,
    pub backup: bool,
    pub recursive: bool,
    pub parallel: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            extensions: Extensions::default(),
            backup: true,
            recursive: true,
            parallel: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanStats {
    pub total_files: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
}

impl fmt::Display for CleanStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Summary:")?;
        writeln!(f, "Total files: {}", self.total_files)?;
        writeln!(f, "Processed:   {}", self.files_processed)?;
        writeln!(f, "Skipped:     {}", self.files_skipped)?;
        write!(f, "{}", "=".repeat(50))
    }
}

pub fn check_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        bail!("directory does not exist: {}", dir.display());
    }
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    Ok(())
}

/// Source files under `dir`, sorted by path. Only the top level is searched
/// unless `opts.recursive` is set.
pub fn find_sources(dir: &Path, opts: &CleanOptions) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).min_depth(1);
    if !opts.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("cannot read directory entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && opts.extensions.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    files
}

/// Checks `dir` and lists the files a clean run would touch.
pub fn plan(dir: &Path, opts: &CleanOptions) -> Result<Vec<PathBuf>> {
    check_directory(dir)?;
    Ok(find_sources(dir, opts))
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Writes `content` next to `path` as `<path>.backup`.
pub fn backup_file(path: &Path, content: &str) -> Result<PathBuf, FileError> {
    let backup = backup_path(path);
    fs::write(&backup, content).map_err(|e| FileError::from_io(&backup, e))?;
    Ok(backup)
}

/// Strips one file in place. A failed backup is logged and does not stop
/// the file from being rewritten.
pub fn process_file(path: &Path, opts: &CleanOptions) -> Result<(), FileError> {
    let original = error::read_text(path)?;

    if opts.backup {
        match backup_file(path, &original) {
            Ok(backup) => debug!("created backup {}", backup.display()),
            Err(e) => warn!("could not create backup: {}", e),
        }
    }

    let cleaned = remove_comments(&original);
    fs::write(path, cleaned).map_err(|e| FileError::from_io(path, e))?;
    debug!("processed {}", path.display());
    Ok(())
}

fn process_logged(path: &Path, opts: &CleanOptions) -> bool {
    match process_file(path, opts) {
        Ok(()) => true,
        Err(e @ FileError::Decode(_)) => {
            warn!("skipping file, {}", e);
            false
        }
        Err(e) => {
            warn!("failed to process {}: {}", e.path().display(), e);
            false
        }
    }
}

/// Strips every matching file under `dir`. Per-file failures are counted as
/// skipped; only an unusable `dir` is an error.
pub fn clean_directory(dir: &Path, opts: &CleanOptions) -> Result<CleanStats> {
    info!("scanning {}", dir.display());
    let files = plan(dir, opts)?;

    let mut stats = CleanStats {
        total_files: files.len(),
        ..CleanStats::default()
    };
    if files.is_empty() {
        info!("no source files found");
        return Ok(stats);
    }
    info!("found {} source files", files.len());

    let outcomes: Vec<bool> = if opts.parallel {
        files
            .par_iter()
            .enumerate()
            .map(|(i, path)| {
                info!("[{}/{}] processing {}", i + 1, files.len(), path.display());
                process_logged(path, opts)
            })
            .collect()
    } else {
        files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                info!("[{}/{}] processing {}", i + 1, files.len(), path.display());
                process_logged(path, opts)
            })
            .collect()
    };

    stats.files_processed = outcomes.iter().filter(|ok| **ok).count();
    stats.files_skipped = outcomes.len() - stats.files_processed;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_ignore_dots_and_case() {
        let exts = Extensions::new(&[".C", "hpp", " .Cu "]);
        assert!(exts.matches(Path::new("a/b.c")));
        assert!(exts.matches(Path::new("x.HPP")));
        assert!(exts.matches(Path::new("kernel.cu")));
        assert!(!exts.matches(Path::new("main.rs")));
        assert!(!exts.matches(Path::new("Makefile")));
    }

    #[test]
    fn backups_are_not_sources() {
        let exts = Extensions::default();
        assert!(!exts.matches(&backup_path(Path::new("src/main.c"))));
        assert_eq!(backup_path(Path::new("src/main.c")), PathBuf::from("src/main.c.backup"));
    }
}
