//! Convert a tree of HTML cable pages into wrapped plain-text files.
//!
//! ```no_run
//! use std::path::Path;
//! use cable2text::{convert, ConvertOptions};
//!
//! let count = convert(Path::new("/data/cable"), Path::new("/out/"), &ConvertOptions::default())?;
//! println!("converted {count} cables");
//! # Ok::<(), cable2text::Error>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod paths;
pub mod types;
pub mod wrap;

pub use config::{ConvertOptions, FileConfig};
pub use convert::{convert, convert_file, convert_tree, render};
pub use error::{Error, Result};
pub use extract::extract;
pub use paths::map_path;
pub use types::{CableDocument, ConvertSummary, OutputPath};
pub use wrap::wrap;
