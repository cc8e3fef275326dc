// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use super::file::{KeyValueFile, KeyValueStyle};
use crate::{ErrorKind, SysnetError, error::io_error_with_path};

/// Merge sysconfig `source` file into `target`.
///
/// Keys defined in `source` overwrite or get appended to `target`, comments
/// and keys only known to `target` are kept. Return whether `target` was
/// modified.
pub fn merge_files(source: &Path, target: &Path) -> Result<bool, SysnetError> {
    if !source.exists() {
        return Err(SysnetError::new(
            ErrorKind::NotFound,
            format!("Source file {} does not exist", source.display()),
        ));
    }
    let src = KeyValueFile::load(source, KeyValueStyle::Sysconfig)?;
    let mut dst = KeyValueFile::load(target, KeyValueStyle::Sysconfig)?;
    let old_content = dst.render();
    merge_into(&src, &mut dst);
    let new_content = dst.render();
    if target.exists() && old_content == new_content {
        log::debug!("{} is already up to date", target.display());
        return Ok(false);
    }
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error_with_path(e, parent))?;
    }
    log::info!("Merging {} into {}", source.display(), target.display());
    std::fs::write(target, new_content)
        .map_err(|e| io_error_with_path(e, target))?;
    Ok(true)
}

pub(crate) fn merge_into(source: &KeyValueFile, target: &mut KeyValueFile) {
    for (key, value) in source.pairs() {
        target.set(key, value);
    }
}
