use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::ImageRef;

/// Extensions (lowercase) picked up by discovery
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "avif", "webp"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Find every image below `root`, recursively, sorted by path.
/// A missing directory yields an empty list.
pub fn discover_images(root: &Path) -> Result<Vec<ImageRef>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    collect_files(root, &mut paths)?;
    paths.retain(|p| is_image_path(p));
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let name = relative_name(root, &path);
            ImageRef::new(path, name)
        })
        .collect())
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }

    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
