//! Picks preview images out of a folder.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ScanError;

/// Upper bound on collected images.
pub const MAX_IMAGES: usize = 5;

const IMAGE_SUFFIXES: [&str; 3] = ["png", "jpg", "jpeg"];

/// Up to [`MAX_IMAGES`] image paths, in directory listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet(Vec<PathBuf>);

impl ImageSet {
    /// The image that gets attached to posts. The Graph API takes one
    /// `picture` per feed post, so the others are never sent.
    pub fn primary(&self) -> Option<&Path> {
        self.0.first().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

fn is_image_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Lists `dir` and keeps the first [`MAX_IMAGES`] image files.
///
/// Order is whatever the OS hands back, it is not sorted.
pub fn try_scan_images(dir: &Path) -> Result<ImageSet, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    let read_err = |source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut images = Vec::with_capacity(MAX_IMAGES);
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_image_name(name) {
            continue;
        }
        // follows symlinks; dangling links are skipped
        let path = entry.path();
        if !std::fs::metadata(&path).is_ok_and(|m| m.is_file()) {
            continue;
        }
        images.push(path);
        if images.len() == MAX_IMAGES {
            break;
        }
    }
    Ok(ImageSet(images))
}

/// Same as [`try_scan_images`] but never fails: problems are logged and an
/// empty set comes back.
pub fn scan_images(dir: &Path) -> ImageSet {
    match try_scan_images(dir) {
        Ok(images) if images.is_empty() => {
            warn!(msg = "no images found", folder = ?dir);
            images
        }
        Ok(images) => {
            info!(msg = "collected images", folder = ?dir, count = images.len());
            images
        }
        Err(e) => {
            warn!(msg = "skipping images", error = %e);
            ImageSet::default()
        }
    }
}
