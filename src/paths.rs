//! Mapping input cable paths onto the output tree.

use std::fs;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{Error, Result};
use crate::types::OutputPath;

/// Directory name that marks the root of the mirrored subtree.
pub const MARKER: &str = "cable";

/// Extension given to every converted file.
pub const OUTPUT_EXTENSION: &str = "txt";

fn is_marker(component: &Component<'_>) -> bool {
    component.as_os_str() == MARKER
}

/// True if any component of `path` is the marker directory.
pub fn has_marker(path: &Path) -> bool {
    path.components().any(|c| is_marker(&c))
}

/// Compute where the text version of `input_file` goes below `output_root`.
///
/// The directories between the last usable `cable` component and the file
/// are recreated under `output_root`; the file keeps its stem and gets a
/// `.txt` extension.
///
/// # Errors
///
/// [`Error::Path`] if no `cable` component is followed by at least a
/// directory and a file name.
pub fn map_path(input_file: &Path, output_root: &Path) -> Result<OutputPath> {
    let components: Vec<Component<'_>> = input_file.components().collect();

    // The marker needs at least a directory and a file after it.
    let marker = components
        .len()
        .checked_sub(2)
        .and_then(|end| components[..end].iter().rposition(is_marker))
        .ok_or_else(|| {
            Error::Path(format!(
                "{} has no '{MARKER}' directory with a subdirectory below it",
                input_file.display()
            ))
        })?;

    let Some((file, dirs)) = components[marker + 1..].split_last() else {
        return Err(Error::Path(format!("{} has no file name", input_file.display())));
    };

    let stem = Path::new(file.as_os_str())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Path(format!("{} has no file name", input_file.display())))?;

    let mut directory = output_root.to_path_buf();
    for dir in dirs {
        directory.push(dir.as_os_str());
    }

    Ok(OutputPath {
        directory,
        filename: format!("{stem}.{OUTPUT_EXTENSION}"),
    })
}

/// Create `dir` and any missing parents. Existing directories are fine.
///
/// # Errors
///
/// [`Error::Write`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|source| Error::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// Output root as given on the command line, with a trailing separator.
pub fn normalize_output_root(raw: &str) -> PathBuf {
    if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') {
        PathBuf::from(raw)
    } else {
        PathBuf::from(format!("{raw}{MAIN_SEPARATOR}"))
    }
}
