use std::path::{Path, PathBuf};

use image::RgbaImage;
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;
use tracing::{debug, info};

use crate::{
    compose::{BackgroundImage, CompositionEngine},
    config::AugmentCfg,
    error::{AugmentError, Result},
    geom::PlacementRect,
    io::{Manifest, OutputDirs, save_png, write_labels},
    label::encode_all,
    preview::draw_placements,
    sampler::ObjectSampler,
    source::{background_paths, object_source},
};

/// Rounds generated per background so that every class gets at least
/// `target_per_class` appearances across all backgrounds.
pub fn repeat_count(target_per_class: usize, num_backgrounds: usize) -> usize {
    target_per_class / num_backgrounds.max(1) + 1
}

/// `{stem}_{background index}_{repeat index}`, shared by the image and label file.
pub fn output_name(stem: &str, bg_index: usize, repeat: usize) -> String {
    format!("{stem}_{bg_index}_{repeat}")
}

/// One composed image and its label lines, before anything touches disk.
pub struct GenerationResult {
    pub name: String,
    pub image: RgbaImage,
    pub placements: Vec<PlacementRect>,
    pub lines: Vec<String>,
    pub requested: usize,
    /// Objects sampled this round that did not make it onto the canvas.
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub rounds: usize,
    pub requested: usize,
    pub placed: usize,
    pub dropped: usize,
    pub manifest: PathBuf,
}

pub struct BatchDriver {
    cfg: AugmentCfg,
    sampler: ObjectSampler,
    backgrounds: Vec<BackgroundImage>,
    engine: CompositionEngine,
}

impl BatchDriver {
    /// Validates `cfg` and loads every object and background image. Nothing
    /// is written until [`run`](Self::run).
    pub fn new(cfg: AugmentCfg, object_dir: &Path, background_dir: &Path) -> Result<Self> {
        cfg.validate()?;
        let source = object_source(object_dir, cfg.layout, cfg.num_classes)?;
        let sampler = ObjectSampler::load(source.as_ref(), &cfg)?;

        let backgrounds = background_paths(background_dir)?
            .iter()
            .map(|p| BackgroundImage::load(p))
            .collect::<Result<Vec<_>>>()?;
        info!(
            backgrounds = backgrounds.len(),
            dir = %background_dir.display(),
            "loaded backgrounds"
        );

        Self::assemble(cfg, sampler, backgrounds)
    }

    pub fn from_parts(
        cfg: AugmentCfg,
        sampler: ObjectSampler,
        backgrounds: Vec<BackgroundImage>,
    ) -> Result<Self> {
        cfg.validate()?;
        Self::assemble(cfg, sampler, backgrounds)
    }

    // `cfg` is already validated
    fn assemble(
        cfg: AugmentCfg,
        sampler: ObjectSampler,
        backgrounds: Vec<BackgroundImage>,
    ) -> Result<Self> {
        if backgrounds.is_empty() {
            return Err(AugmentError::Configuration(
                "at least one background image is required".to_string(),
            ));
        }
        let engine = CompositionEngine::new(&cfg)?;
        Ok(Self {
            cfg,
            sampler,
            backgrounds,
            engine,
        })
    }

    pub fn repeat_count(&self) -> usize {
        repeat_count(self.cfg.target_images_per_class, self.backgrounds.len())
    }

    pub fn total_rounds(&self) -> usize {
        self.repeat_count() * self.backgrounds.len()
    }

    /// Samples, composes and encodes one round on background `bg_index`.
    pub fn generate_one<R: Rng + ?Sized>(
        &mut self,
        bg_index: usize,
        repeat: usize,
        rng: &mut R,
    ) -> GenerationResult {
        let background = &self.backgrounds[bg_index];
        let objects = self.sampler.sample_round(rng);
        let composition = self.engine.compose_one(&objects, background, rng);
        let lines = encode_all(&self.cfg, &composition.placements);

        GenerationResult {
            name: output_name(&background.stem, bg_index, repeat),
            image: composition.image,
            placements: composition.placements,
            lines,
            requested: objects.len(),
            dropped: composition.dropped,
        }
    }

    /// Runs every (background, repeat) round, writing an image and label file
    /// for each, then the manifest. The first write failure stops the batch;
    /// files already written stay.
    pub fn run(&mut self, manifest_path: &Path, seed: u64) -> Result<BatchSummary> {
        let dirs = OutputDirs::create(&self.cfg)?;
        let repeats = self.repeat_count();
        info!(
            seed,
            backgrounds = self.backgrounds.len(),
            repeats,
            rounds = self.total_rounds(),
            "starting batch"
        );

        let mut seeds = SplitMix64::seed_from_u64(seed);
        let mut manifest = Manifest::default();
        let mut rounds = 0;
        let mut requested = 0;
        let mut placed = 0;
        let mut dropped = 0;

        for bg_index in 0..self.backgrounds.len() {
            for repeat in 0..repeats {
                let mut rng = SmallRng::seed_from_u64(seeds.next_u64());
                let result = self.generate_one(bg_index, repeat, &mut rng);

                let image_path = dirs.image_path(&result.name);
                save_png(&result.image, &image_path)?;
                write_labels(&dirs.label_path(&result.name), &result.lines)?;
                if let Some(preview_path) = dirs.preview_path(&result.name) {
                    save_png(&draw_placements(&result.image, &result.placements), &preview_path)?;
                }
                debug!(
                    name = %result.name,
                    objects = result.placements.len(),
                    "round written"
                );

                rounds += 1;
                requested += result.requested;
                placed += result.placements.len();
                dropped += result.dropped;
                manifest.push(image_path);
            }
        }

        manifest.write_to(manifest_path)?;
        let summary = BatchSummary {
            rounds,
            requested,
            placed,
            dropped,
            manifest: manifest_path.to_path_buf(),
        };
        info!(
            rounds = summary.rounds,
            placed = summary.placed,
            dropped = summary.dropped,
            manifest = %summary.manifest.display(),
            "batch finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_count_floors_then_adds_one() {
        assert_eq!(repeat_count(10, 2), 6);
        assert_eq!(repeat_count(10, 3), 4);
        assert_eq!(repeat_count(1000, 1), 1001);
        assert_eq!(repeat_count(0, 5), 1);
    }

    #[test]
    fn from_parts_checks_the_config() {
        let cfg = AugmentCfg {
            num_classes: 0,
            ..Default::default()
        };
        let sampler = ObjectSampler::from_objects(Default::default(), &cfg).unwrap();
        let bg = BackgroundImage {
            stem: "bg".into(),
            image: RgbaImage::new(416, 416),
        };

        assert!(matches!(
            BatchDriver::from_parts(cfg, sampler, vec![bg]),
            Err(AugmentError::Configuration(_))
        ));
    }

    #[test]
    fn output_name_joins_stem_and_indices() {
        assert_eq!(output_name("street", 3, 12), "street_3_12");
    }
}
