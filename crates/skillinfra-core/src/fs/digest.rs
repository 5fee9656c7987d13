//! Deterministic content digest of a build artifact.
//!
//! A build artifact is either a single file (e.g. a pre-built zip) or a
//! source directory. Both produce a BLAKE3 hex digest that only changes when
//! the bytes or the relative layout change.

use anyhow::Context;
use std::fs;
use std::path::Path;

const FILE_ROOT: u8 = 0x01;
const DIR_ROOT: u8 = 0x02;
const FILE: u8 = b'f';
const DIR: u8 = b'd';

/// Compute the digest of a file or directory tree.
///
/// # Algorithm
/// - File: `blake3(FILE_ROOT || len(content) || content)`
/// - Directory: `DIR_ROOT`, then a recursive traversal with entries sorted by
///   name; each file contributes `FILE || len(path) || path || len(content) ||
///   content`, each directory `DIR || len(path) || path`
/// - Lengths are little-endian `u64`, so no two distinct trees share an
///   input stream
/// - Output: 64-char hex string
///
/// Symlinks are rejected rather than followed.
///
/// # Example
/// ```no_run
/// use skillinfra_core::fs::digest::hash_path;
/// use std::path::Path;
///
/// let digest = hash_path(Path::new("./lambda"))?;
/// assert_eq!(digest.len(), 64);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn hash_path(path: &Path) -> anyhow::Result<String> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to access artifact: {}", path.display()))?;

    let mut hasher = blake3::Hasher::new();
    if metadata.is_file() {
        let content =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        hasher.update(&[FILE_ROOT]);
        update_framed(&mut hasher, &content);
    } else if metadata.is_dir() {
        hasher.update(&[DIR_ROOT]);
        hash_dir_recursive(&mut hasher, path, "")?;
    } else {
        anyhow::bail!("Unsupported artifact type: {}", path.display());
    }
    Ok(hasher.finalize().to_hex().to_string())
}

fn hash_dir_recursive(hasher: &mut blake3::Hasher, dir: &Path, base: &str) -> anyhow::Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut sorted_entries: Vec<_> = entries
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    sorted_entries.sort_by_key(|e| e.file_name());

    for entry in sorted_entries {
        let name = entry.file_name();
        let rel_path = if base.is_empty() {
            name.to_string_lossy().to_string()
        } else {
            format!("{}/{}", base, name.to_string_lossy())
        };

        let ty = entry
            .file_type()
            .with_context(|| format!("Failed to stat file: {}", entry.path().display()))?;

        if ty.is_dir() {
            hasher.update(&[DIR]);
            update_framed(hasher, rel_path.as_bytes());
            hash_dir_recursive(hasher, &entry.path(), &rel_path)?;
        } else if ty.is_file() {
            let content = fs::read(entry.path())
                .with_context(|| format!("Failed to read file: {}", entry.path().display()))?;
            hasher.update(&[FILE]);
            update_framed(hasher, rel_path.as_bytes());
            update_framed(hasher, &content);
        } else if ty.is_symlink() {
            anyhow::bail!("Symlinks are not supported: {}", entry.path().display());
        } else {
            anyhow::bail!(
                "Unsupported filesystem entry type: {}",
                entry.path().display()
            );
        }
    }

    Ok(())
}

/// Length-prefixed write.
fn update_framed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
