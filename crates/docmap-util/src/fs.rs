use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Extensions accepted as documentation sources for non-declaration conditions.
pub const SOURCE_EXTENSIONS: &[&str] = &[".js", ".mjs", ".ts", ".mts"];

/// Extensions of TypeScript declaration files.
pub const DECLARATION_EXTENSIONS: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

/// Returns true if `path` is an existing regular file.
///
/// Any I/O error (missing path, permission denied) counts as `false`.
#[must_use]
pub fn is_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

/// Returns true if `path` is an existing directory.
#[must_use]
pub fn is_dir(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

/// Returns true if `path` is an existing file with a declaration extension.
#[must_use]
pub fn is_declaration_file(path: &Path) -> bool {
    has_extension(path, DECLARATION_EXTENSIONS) && is_file(path)
}

/// Returns true if `path` carries one of the allowed source extensions.
///
/// Only the name is inspected; pair with [`is_file`] when existence matters.
#[must_use]
pub fn is_allowed_source_file(path: &Path) -> bool {
    has_extension(path, SOURCE_EXTENSIONS)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(ext))
}

/// Atomically write bytes to a file by writing to a temp file then renaming.
///
/// This provides crash-safety: the file will either have the old contents or
/// the new contents, never a partial write.
///
/// # Errors
/// Returns an error if the write or rename fails.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_path = parent.to_path_buf();
    temp_path.push(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        std::process::id()
    ));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    match fs::rename(&temp_path, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            // On Windows, rename can fail if target exists. Try copy + remove as fallback.
            if cfg!(windows) {
                fs::copy(&temp_path, path)?;
                let _ = fs::remove_file(&temp_path);
                Ok(())
            } else {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }
}
