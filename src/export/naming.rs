use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::export::staging::remove_if_exists;
use crate::foundation::error::{ClipError, ClipResult};

/// Upper bound on create-new retries before giving up.
const MAX_RESERVE_ATTEMPTS: u32 = 10_000;

/// Directory and file base resolved from a filename prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    /// Absolute folder the files go into.
    pub full_output_folder: PathBuf,
    /// Folder relative to the output directory, `/`-separated. Empty for the root.
    pub subfolder: String,
    /// Last component of the prefix.
    pub base: String,
}

impl OutputTarget {
    /// `<base>_<counter:05>_.<ext>`
    pub fn file_name(&self, counter: u32, ext: &str) -> String {
        format!("{}_{counter:05}_.{ext}", self.base)
    }

    pub fn file_path(&self, counter: u32, ext: &str) -> PathBuf {
        self.full_output_folder.join(self.file_name(counter, ext))
    }

    /// One past the highest counter already used for `base` in the folder,
    /// regardless of extension. A missing folder starts at 1.
    pub fn next_counter(&self) -> ClipResult<u32> {
        let entries = match std::fs::read_dir(&self.full_output_folder) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!(
                        "list output folder '{}'",
                        self.full_output_folder.display()
                    ))
                    .into());
            }
        };

        let mut max = 0u32;
        for entry in entries {
            let entry = entry.context("read output folder entry")?;
            let name = entry.file_name();
            if let Some(counter) = name.to_str().and_then(|n| parse_counter(n, &self.base)) {
                max = max.max(counter);
            }
        }
        Ok(max.saturating_add(1))
    }

    /// Claim the next free `<base>_<counter>_.<ext>` by creating it empty.
    ///
    /// Creation uses create-new semantics, so concurrent callers (threads or
    /// processes) sharing the folder never receive the same counter.
    pub fn reserve(&self, ext: &str) -> ClipResult<OutputReservation> {
        let mut counter = self.next_counter()?;
        for _ in 0..MAX_RESERVE_ATTEMPTS {
            let path = self.file_path(counter, ext);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), counter, "reserved output file");
                    return Ok(OutputReservation {
                        counter,
                        file_name: self.file_name(counter, ext),
                        path,
                        committed: false,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    counter = counter.checked_add(1).ok_or_else(|| {
                        ClipError::export_failed("output counter space exhausted")
                    })?;
                }
                Err(e) => {
                    return Err(ClipError::export_failed(format!(
                        "failed to create output file '{}': {e}",
                        path.display()
                    )));
                }
            }
        }
        Err(ClipError::export_failed(format!(
            "could not reserve an output file for '{}' after {MAX_RESERVE_ATTEMPTS} attempts",
            self.base
        )))
    }
}

/// An output file claimed on disk but not yet filled.
///
/// Unless [`OutputReservation::commit`] is called, dropping the reservation
/// removes the file, taking any partially written output with it.
#[derive(Debug)]
pub struct OutputReservation {
    counter: u32,
    file_name: String,
    path: PathBuf,
    committed: bool,
}

impl OutputReservation {
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file.
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for OutputReservation {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = remove_if_exists(&self.path) {
            tracing::warn!(error = %e, "partial output file left behind");
        }
    }
}

/// Resolve `prefix` against `output_dir`.
///
/// `%width%` / `%height%` are substituted first. Both `/` and `\` separate
/// folders. Prefixes that are absolute, climb out of `output_dir`, or
/// contain `:` in any component are rejected.
pub fn resolve_prefix(
    output_dir: &Path,
    prefix: &str,
    width: u32,
    height: u32,
) -> ClipResult<OutputTarget> {
    let expanded = prefix
        .replace("%width%", &width.to_string())
        .replace("%height%", &height.to_string());

    if expanded.starts_with(['/', '\\']) {
        return Err(ClipError::invalid_input(format!(
            "filename prefix must be relative, got {prefix:?}"
        )));
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in expanded.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(ClipError::invalid_input(format!(
                    "filename prefix must stay inside the output directory, got {prefix:?}"
                )));
            }
            // `:` marks drive letters and NTFS streams on Windows.
            p if p.contains(':') => {
                return Err(ClipError::invalid_input(format!(
                    "filename prefix must not contain ':', got {prefix:?}"
                )));
            }
            p => parts.push(p),
        }
    }

    if expanded.ends_with(['/', '\\']) {
        return Err(ClipError::invalid_input(format!(
            "filename prefix must end with a file name, got {prefix:?}"
        )));
    }
    let Some(base) = parts.pop() else {
        return Err(ClipError::invalid_input("filename prefix is empty"));
    };

    let mut full_output_folder = output_dir.to_path_buf();
    for p in &parts {
        full_output_folder.push(p);
    }

    Ok(OutputTarget {
        full_output_folder,
        subfolder: parts.join("/"),
        base: base.to_string(),
    })
}

/// Counter from `<base>_<digits>_.<ext>`.
fn parse_counter(file_name: &str, base: &str) -> Option<u32> {
    let rest = file_name.strip_prefix(base)?.strip_prefix('_')?;
    let (digits, tail) = rest.split_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || !tail.starts_with('.') {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
