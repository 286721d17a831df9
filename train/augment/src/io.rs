use image::RgbaImage;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    config::AugmentCfg,
    error::{AugmentError, Result},
};

pub struct OutputDirs {
    pub images: PathBuf,
    pub labels: PathBuf,
    pub preview: Option<PathBuf>,
}

impl OutputDirs {
    /// Creates the output folders if they are missing.
    pub fn create(cfg: &AugmentCfg) -> Result<Self> {
        let dirs = Self {
            images: cfg.images_path(),
            labels: cfg.labels_path(),
            preview: cfg.preview.then(|| cfg.preview_path()),
        };
        for dir in [Some(&dirs.images), Some(&dirs.labels), dirs.preview.as_ref()]
            .into_iter()
            .flatten()
        {
            fs::create_dir_all(dir).map_err(|e| AugmentError::io(dir, e))?;
        }
        Ok(dirs)
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.images.join(format!("{name}.png"))
    }

    pub fn label_path(&self, name: &str) -> PathBuf {
        self.labels.join(format!("{name}.txt"))
    }

    pub fn preview_path(&self, name: &str) -> Option<PathBuf> {
        self.preview.as_ref().map(|dir| dir.join(format!("{name}.png")))
    }
}

pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| AugmentError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes already newline-terminated lines. An empty slice gives an empty file.
pub fn write_labels(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.concat()).map_err(|e| AugmentError::io(path, e))
}

/// Generated image paths, kept in memory until [`Manifest::write_to`].
#[derive(Debug, Default)]
pub struct Manifest {
    paths: Vec<PathBuf>,
}

impl Manifest {
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// One path per line, in push order.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AugmentError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| AugmentError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        for p in &self.paths {
            writeln!(writer, "{}", p.display()).map_err(|e| AugmentError::io(path, e))?;
        }
        writer
            .into_inner()
            .map_err(|e| AugmentError::io(path, e.into_error()))?
            .sync_all()
            .map_err(|e| AugmentError::io(path, e))
    }
}
