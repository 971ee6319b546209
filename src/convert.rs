//! Walks an input tree and converts every cable found into a text file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ConvertOptions;
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::paths::{ensure_dir, has_marker, map_path, MARKER};
use crate::types::{CableDocument, ConvertSummary};
use crate::wrap::wrap;

/// Convert every cable under `input_root` and return how many were written.
///
/// # Errors
///
/// See [`convert_tree`].
pub fn convert(input_root: &Path, output_root: &Path, options: &ConvertOptions) -> Result<usize> {
    convert_tree(input_root, output_root, options).map(|summary| summary.converted)
}

/// Convert every cable under `input_root`, mirroring the tree into `output_root`.
///
/// Files that fail to parse or cannot be written are logged and skipped.
/// Symlinks to files are converted like regular files.
///
/// # Errors
///
/// [`Error::Config`] if `input_root` is not a readable `cable` directory, and
/// [`Error::InputOpen`] as soon as any input file cannot be read.
pub fn convert_tree(
    input_root: &Path,
    output_root: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    validate_input_root(input_root)?;

    let mut summary = ConvertSummary::default();
    for entry in WalkDir::new(input_root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            // Links to files are read through; links to directories are not walked.
            if path.is_dir() {
                debug!(path = %path.display(), "not following directory symlink");
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }

        if options.is_ignored(path) {
            debug!(path = %path.display(), "skipping file by ignore pattern");
            summary.skipped += 1;
            continue;
        }

        match convert_file(path, output_root, options.width) {
            Ok(written) => {
                println!("wrote {}", written.display());
                summary.converted += 1;
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping cable");
                summary.failed += 1;
            }
        }
    }

    debug!(
        converted = summary.converted,
        failed = summary.failed,
        skipped = summary.skipped,
        "walk finished"
    );
    Ok(summary)
}

fn validate_input_root(input_root: &Path) -> Result<()> {
    if !has_marker(input_root) {
        return Err(Error::Config(format!(
            "invalid path to cables top level directory {}, looking for directory '{MARKER}'",
            input_root.display()
        )));
    }
    if !input_root.exists() {
        return Err(Error::Config(format!(
            "the directory {} does not exist",
            input_root.display()
        )));
    }
    fs::read_dir(input_root).map_err(|err| {
        Error::Config(format!("cannot read directory {}: {err}", input_root.display()))
    })?;
    Ok(())
}

/// Run one file through read, extract, wrap and write; returns the written path.
///
/// # Errors
///
/// [`Error::InputOpen`] if the file cannot be read; any other variant only
/// concerns this file.
pub fn convert_file(input: &Path, output_root: &Path, width: i64) -> Result<PathBuf> {
    let bytes = fs::read(input).map_err(|source| Error::InputOpen {
        path: input.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8_lossy(&bytes);

    let out = map_path(input, output_root)?;
    let document = extract(&html)?;

    ensure_dir(&out.directory)?;
    let target = out.file_path();
    write_document(&target, &document, width)?;
    Ok(target)
}

/// Text form of a cable: `label: value` lines, a blank line, then the body
/// wrapped at `width`, each body line wrapped on its own.
pub fn render(document: &CableDocument, width: i64) -> String {
    let mut out = String::new();
    for (label, value) in &document.headers {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out.push('\n');

    for line in document.body.split('\n') {
        let chunks = wrap(line, width);
        if chunks.is_empty() {
            out.push('\n');
        }
        for chunk in chunks {
            out.push_str(chunk);
            out.push('\n');
        }
    }
    out
}

fn write_document(target: &Path, document: &CableDocument, width: i64) -> Result<()> {
    let write = || -> std::io::Result<()> {
        let mut f = BufWriter::new(File::create(target)?);
        f.write_all(render(document, width).as_bytes())?;
        f.flush()
    };
    write().map_err(|source| Error::Write {
        path: target.to_path_buf(),
        source,
    })
}
