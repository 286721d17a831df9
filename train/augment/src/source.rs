//! Discovery of object and background image files.

use std::{
    collections::BTreeMap,
    fs::read_dir,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    config::SourceLayout,
    error::{AugmentError, Result},
};

pub type ClassPaths = BTreeMap<u32, Vec<PathBuf>>;

/// Lists object image files grouped by class id.
pub trait ObjectSource {
    fn dir(&self) -> &Path;

    /// Every id in `0..num_classes` is present in the result, possibly with
    /// no paths. Files that belong to no configured class are ignored.
    fn list_by_class(&self, num_classes: u32) -> Result<ClassPaths>;
}

/// `{class}.png`, `{class}_anything.png` or `{class}-anything.png` directly
/// inside the object directory.
pub struct FlatSource {
    dir: PathBuf,
}

impl FlatSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ObjectSource for FlatSource {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn list_by_class(&self, num_classes: u32) -> Result<ClassPaths> {
        let mut by_class = empty_classes(num_classes);
        for path in list_pngs(&self.dir)? {
            let class = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(class_prefix);
            match class.and_then(|id| by_class.get_mut(&id)) {
                Some(paths) => paths.push(path),
                None => debug!(path = %path.display(), "not a class image, skipped"),
            }
        }
        Ok(by_class)
    }
}

/// One subdirectory per class, named by the class id, holding any `.png` files.
pub struct PerClassDirSource {
    dir: PathBuf,
}

impl PerClassDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ObjectSource for PerClassDirSource {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn list_by_class(&self, num_classes: u32) -> Result<ClassPaths> {
        let mut by_class = empty_classes(num_classes);
        for (id, paths) in by_class.iter_mut() {
            let class_dir = self.dir.join(id.to_string());
            if class_dir.is_dir() {
                *paths = list_pngs(&class_dir)?;
            }
        }
        Ok(by_class)
    }
}

/// Picks the source for `layout`. `Auto` chooses per-class directories when
/// at least one class-id subdirectory exists.
pub fn object_source(
    dir: &Path,
    layout: SourceLayout,
    num_classes: u32,
) -> Result<Box<dyn ObjectSource>> {
    if !dir.is_dir() {
        return Err(AugmentError::Configuration(format!(
            "object directory '{}' does not exist",
            dir.display()
        )));
    }

    let layout = match layout {
        SourceLayout::Auto if (0..num_classes).any(|id| dir.join(id.to_string()).is_dir()) => {
            SourceLayout::PerClass
        }
        SourceLayout::Auto => SourceLayout::Flat,
        other => other,
    };
    debug!(dir = %dir.display(), ?layout, "object layout");

    Ok(match layout {
        SourceLayout::PerClass => Box::new(PerClassDirSource::new(dir)),
        _ => Box::new(FlatSource::new(dir)),
    })
}

/// Background files: every `.png` directly inside `dir`, sorted.
pub fn background_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AugmentError::Configuration(format!(
            "background directory '{}' does not exist",
            dir.display()
        )));
    }
    let paths = list_pngs(dir)?;
    if paths.is_empty() {
        return Err(AugmentError::Configuration(format!(
            "no .png images found in background directory '{}'",
            dir.display()
        )));
    }
    Ok(paths)
}

/// Non-recursive, sorted by path.
pub fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = read_dir(dir)
        .map_err(|e| AugmentError::io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn empty_classes(num_classes: u32) -> ClassPaths {
    (0..num_classes).map(|id| (id, Vec::new())).collect()
}

fn class_prefix(stem: &str) -> Option<u32> {
    let head = stem.split(['_', '-']).next()?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}
