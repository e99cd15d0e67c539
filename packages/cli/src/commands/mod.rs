pub mod apply;
pub mod format;
pub mod init;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use format::{format, FormatArgs};
pub use init::{init, InitArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use pagecraft_common::DEFAULT_CONFIG_NAME;

/// Every `*.json` page under `dir`, skipping the config file
pub(crate) fn find_page_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_config = path.file_name().and_then(|s| s.to_str()) == Some(DEFAULT_CONFIG_NAME);
        if path.is_file() && !is_config && path.extension().and_then(|s| s.to_str()) == Some("json")
        {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
