use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use rand::Rng;
use serde::Deserialize;

use crate::error::{AugmentError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// `class cx cy w h`, normalized to the canvas
    #[default]
    Yolo,
    /// `class 0.0 0 0.0 left top right bottom` plus zeroed 3D fields
    Kitti,
}

/// How the class column of a label line is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelNames {
    #[default]
    Id,
    Name,
}

/// Layout of the object directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceLayout {
    /// `per-class` if any class-id subdirectory exists, `flat` otherwise
    #[default]
    Auto,
    /// `{class}.png` or `{class}_*.png` directly in the directory
    Flat,
    /// `{class}/*.png`
    PerClass,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackerKind {
    Shelf,
    #[default]
    Guillotine,
}

impl From<PackerKind> for packer::Kind {
    fn from(kind: PackerKind) -> Self {
        match kind {
            PackerKind::Shelf => packer::Kind::Shelf,
            PackerKind::Guillotine => packer::Kind::Guillotine,
        }
    }
}

/// A small discrete set of allowed values, drawn with a uniform index.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Candidates<T>(Vec<T>);

impl<T: Copy> Candidates<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Panics on an empty set; [`AugmentCfg::validate`] rejects those.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.0[rng.random_range(0..self.0.len())]
    }
}

/// Half-open `[min, max)` pixel range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct JitterRange {
    pub min: u32,
    pub max: u32,
}

impl JitterRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..self.max)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentCfg {
    pub width: u32,
    pub height: u32,
    pub num_classes: u32,
    pub target_images_per_class: usize,
    pub blend_alphas: Candidates<f32>,
    pub scale_factors: Candidates<f32>,
    pub jitter: JitterRange,
    /// Offset from the packed corner to where the object is drawn.
    pub boundary: [u32; 2],
    pub out_root: PathBuf,
    pub images_dir: String,
    pub labels_dir: String,
    pub label_format: LabelFormat,
    pub label_names: LabelNames,
    /// Defaults to `Class0`, `Class1`, ... when absent.
    pub class_names: Option<Vec<String>>,
    pub layout: SourceLayout,
    pub packer: PackerKind,
    pub preview: bool,
    pub preview_dir: String,
}

impl Default for AugmentCfg {
    fn default() -> Self {
        Self {
            width: 416,
            height: 416,
            num_classes: 26,
            target_images_per_class: 1000,
            blend_alphas: Candidates::new(vec![0.70, 0.75, 0.80, 0.85, 0.90]),
            scale_factors: Candidates::new(vec![1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8]),
            jitter: JitterRange { min: 10, max: 20 },
            boundary: [5, 5],
            out_root: PathBuf::from("."),
            images_dir: "out_images".to_string(),
            labels_dir: "out_labels".to_string(),
            label_format: LabelFormat::Yolo,
            label_names: LabelNames::Id,
            class_names: None,
            layout: SourceLayout::Auto,
            packer: PackerKind::Guillotine,
            preview: false,
            preview_dir: "out_preview".to_string(),
        }
    }
}

impl AugmentCfg {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AugmentError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            AugmentError::Configuration(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(AugmentError::Configuration(msg));

        if self.width == 0 || self.height == 0 {
            return fail(format!("canvas must be non-empty, got {}x{}", self.width, self.height));
        }
        if self.num_classes == 0 {
            return fail("num_classes must be at least 1".to_string());
        }
        if self.scale_factors.is_empty() || self.blend_alphas.is_empty() {
            return fail("scale_factors and blend_alphas need at least one value".to_string());
        }
        if let Some(s) = self.scale_factors.values().iter().find(|s| !(**s > 0.0)) {
            return fail(format!("scale factor {s} must be positive"));
        }
        if let Some(a) = self
            .blend_alphas
            .values()
            .iter()
            .find(|a| !(0.0..=1.0).contains(*a))
        {
            return fail(format!("blend alpha {a} is outside [0, 1]"));
        }
        if self.jitter.min >= self.jitter.max {
            return fail(format!(
                "jitter range [{}, {}) is empty",
                self.jitter.min, self.jitter.max
            ));
        }
        for (axis, (offset, extent)) in ["x", "y"]
            .iter()
            .zip(self.boundary.iter().zip([self.width, self.height]))
        {
            if *offset >= extent {
                return fail(format!("boundary {axis} offset {offset} leaves no room on a {extent}px canvas"));
            }
            if *offset > self.jitter.min {
                return fail(format!(
                    "boundary {axis} offset {offset} exceeds the minimum jitter {}, objects would leave their packed slot",
                    self.jitter.min
                ));
            }
        }
        if self.label_names == LabelNames::Name {
            if let Some(names) = &self.class_names {
                if names.len() < self.num_classes as usize {
                    return fail(format!(
                        "{} class names given for {} classes",
                        names.len(),
                        self.num_classes
                    ));
                }
                if let Some(n) = names.iter().find(|n| n.is_empty() || n.contains(char::is_whitespace)) {
                    return fail(format!("class name '{n}' must be a single non-empty word"));
                }
            }
        }
        Ok(())
    }

    pub fn class_name(&self, class_id: u32) -> String {
        self.class_names
            .as_ref()
            .and_then(|names| names.get(class_id as usize).cloned())
            .unwrap_or_else(|| format!("Class{class_id}"))
    }

    /// Text written in the class column for `class_id`.
    pub fn class_label(&self, class_id: u32) -> String {
        match self.label_names {
            LabelNames::Id => class_id.to_string(),
            LabelNames::Name => self.class_name(class_id),
        }
    }

    /// Inverse of [`class_label`](Self::class_label): accepts a bare id or a class name.
    pub fn resolve_class(&self, token: &str) -> Option<u32> {
        if let Ok(id) = token.parse::<u32>() {
            return (id < self.num_classes).then_some(id);
        }
        (0..self.num_classes).find(|id| self.class_name(*id) == token)
    }

    pub fn images_path(&self) -> PathBuf {
        self.out_root.join(&self.images_dir)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.out_root.join(&self.labels_dir)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.out_root.join(&self.preview_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn defaults_are_valid() {
        AugmentCfg::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: AugmentCfg = serde_json::from_str(
            r#"{ "num_classes": 3, "label_format": "kitti", "layout": "per-class",
                 "scale_factors": [1.0], "jitter": { "min": 2, "max": 4 } }"#,
        )
        .unwrap();

        assert_eq!(cfg.num_classes, 3);
        assert_eq!(cfg.label_format, LabelFormat::Kitti);
        assert_eq!(cfg.layout, SourceLayout::PerClass);
        assert_eq!(cfg.scale_factors.values(), &[1.0]);
        assert_eq!(cfg.jitter, JitterRange { min: 2, max: 4 });
        assert_eq!(cfg.width, 416);
        assert_eq!(cfg.images_dir, "out_images");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<AugmentCfg>(r#"{ "widht": 10 }"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            AugmentCfg { width: 0, ..Default::default() },
            AugmentCfg { num_classes: 0, ..Default::default() },
            AugmentCfg { jitter: JitterRange { min: 20, max: 20 }, ..Default::default() },
            AugmentCfg { blend_alphas: Candidates::new(vec![1.5]), ..Default::default() },
            AugmentCfg { scale_factors: Candidates::new(vec![]), ..Default::default() },
            AugmentCfg { scale_factors: Candidates::new(vec![0.0]), ..Default::default() },
            AugmentCfg { boundary: [450, 5], ..Default::default() },
            AugmentCfg { boundary: [5, u32::MAX], ..Default::default() },
            AugmentCfg { boundary: [11, 5], ..Default::default() },
            AugmentCfg {
                num_classes: 3,
                label_names: LabelNames::Name,
                class_names: Some(vec!["a".into(), "b".into()]),
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(AugmentError::Configuration(_))),
                "{cfg:?} should not validate"
            );
        }
    }

    #[test]
    fn candidates_only_yield_listed_values() {
        let c = Candidates::new(vec![0.7f32, 0.8, 0.9]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(c.values().contains(&c.sample(&mut rng)));
        }
    }

    #[test]
    fn jitter_stays_in_half_open_range() {
        let j = JitterRange { min: 10, max: 20 };
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            assert!((10..20).contains(&j.sample(&mut rng)));
        }
    }

    #[test]
    fn class_labels_follow_name_mode() {
        let mut cfg = AugmentCfg { num_classes: 3, ..Default::default() };
        assert_eq!(cfg.class_label(2), "2");

        cfg.label_names = LabelNames::Name;
        assert_eq!(cfg.class_label(2), "Class2");
        cfg.class_names = Some(vec!["cat".into(), "dog".into(), "fox".into()]);
        assert_eq!(cfg.class_label(1), "dog");

        assert_eq!(cfg.resolve_class("fox"), Some(2));
        assert_eq!(cfg.resolve_class("0"), Some(0));
        assert_eq!(cfg.resolve_class("7"), None);
        assert_eq!(cfg.resolve_class("owl"), None);
    }
}
