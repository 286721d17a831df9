use std::{collections::BTreeMap, path::PathBuf};

use image::{RgbaImage, imageops::FilterType};
use packer::Size;
use rand::Rng;
use tracing::info;

use crate::{
    config::{AugmentCfg, Candidates, JitterRange},
    error::{AugmentError, Result},
    source::ObjectSource,
};

/// A decoded object cutout and the class it belongs to.
pub struct ObjectImage {
    pub class_id: u32,
    pub image: RgbaImage,
}

/// One object drawn for a round, already scaled. `jitter` is extra room asked
/// of the packer only; it never shows up in the drawn or labelled rectangle.
pub struct ScaledObject {
    pub class_id: u32,
    pub scale: f32,
    pub image: RgbaImage,
    pub jitter: (u32, u32),
}

impl ScaledObject {
    pub fn pack_size(&self) -> Size {
        Size::new(
            self.image.width() + self.jitter.0,
            self.image.height() + self.jitter.1,
        )
    }
}

pub struct ObjectSampler {
    classes: BTreeMap<u32, Vec<ObjectImage>>,
    scales: Candidates<f32>,
    jitter: JitterRange,
}

impl ObjectSampler {
    /// Lists and decodes every object image. Empty classes are reported
    /// before anything is decoded.
    pub fn load(source: &dyn ObjectSource, cfg: &AugmentCfg) -> Result<Self> {
        let by_class = source.list_by_class(cfg.num_classes)?;
        if let Some((&class_id, _)) = by_class.iter().find(|(_, paths)| paths.is_empty()) {
            return Err(AugmentError::EmptyClass {
                class_id,
                dir: source.dir().to_path_buf(),
            });
        }

        let mut classes = BTreeMap::new();
        for (class_id, paths) in by_class {
            let images = paths
                .into_iter()
                .map(|path| -> Result<ObjectImage> {
                    let image = image::open(&path)
                        .map_err(|source| AugmentError::Decode {
                            path: path.clone(),
                            source,
                        })?
                        .to_rgba8();
                    Ok(ObjectImage { class_id, image })
                })
                .collect::<Result<Vec<_>>>()?;
            classes.insert(class_id, images);
        }

        let total: usize = classes.values().map(Vec::len).sum();
        info!(
            classes = classes.len(),
            images = total,
            dir = %source.dir().display(),
            "loaded object images"
        );

        Self::from_objects(classes, cfg)
    }

    pub fn from_objects(classes: BTreeMap<u32, Vec<ObjectImage>>, cfg: &AugmentCfg) -> Result<Self> {
        for class_id in 0..cfg.num_classes {
            if classes.get(&class_id).is_none_or(Vec::is_empty) {
                return Err(AugmentError::EmptyClass {
                    class_id,
                    dir: PathBuf::new(),
                });
            }
        }
        Ok(Self {
            classes,
            scales: cfg.scale_factors.clone(),
            jitter: cfg.jitter,
        })
    }

    /// One object per class, in class order: a uniform pick from that
    /// class's images, scaled by a uniform pick from the scale set.
    pub fn sample_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ScaledObject> {
        self.classes
            .iter()
            .map(|(&class_id, images)| {
                let source = &images[rng.random_range(0..images.len())];
                let scale = self.scales.sample(rng);
                let jitter = (self.jitter.sample(rng), self.jitter.sample(rng));
                ScaledObject {
                    class_id,
                    scale,
                    image: scale_image(&source.image, scale),
                    jitter,
                }
            })
            .collect()
    }
}

/// Bicubic resize by `factor`, never below one pixel per side.
pub fn scale_image(image: &RgbaImage, factor: f32) -> RgbaImage {
    let (w, h) = scaled_size(image.width(), image.height(), factor);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    image::imageops::resize(image, w, h, FilterType::CatmullRom)
}

pub fn scaled_size(w: u32, h: u32, factor: f32) -> (u32, u32) {
    let s = |v: u32| ((v as f32 * factor).round() as u32).max(1);
    (s(w), s(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::{SeedableRng, rngs::SmallRng};

    fn object(class_id: u32, side: u32) -> ObjectImage {
        ObjectImage {
            class_id,
            image: RgbaImage::from_pixel(side, side, Rgba([class_id as u8, 0, 0, 255])),
        }
    }

    fn cfg(num_classes: u32) -> AugmentCfg {
        AugmentCfg {
            num_classes,
            ..Default::default()
        }
    }

    #[test]
    fn scaled_size_rounds_and_keeps_one_pixel() {
        assert_eq!(scaled_size(50, 50, 1.1), (55, 55));
        assert_eq!(scaled_size(50, 20, 1.5), (75, 30));
        assert_eq!(scaled_size(1, 1, 0.1), (1, 1));
    }

    #[test]
    fn every_class_must_have_an_image() {
        let mut classes = BTreeMap::new();
        classes.insert(0, vec![object(0, 10)]);
        classes.insert(1, vec![]);
        match ObjectSampler::from_objects(classes, &cfg(2)) {
            Err(AugmentError::EmptyClass { class_id, .. }) => assert_eq!(class_id, 1),
            other => panic!("expected EmptyClass, got {:?}", other.err()),
        }
    }

    #[test]
    fn round_has_one_scaled_object_per_class() {
        let mut classes = BTreeMap::new();
        for id in 0..3 {
            classes.insert(id, vec![object(id, 50), object(id, 40)]);
        }
        let cfg = cfg(3);
        let sampler = ObjectSampler::from_objects(classes, &cfg).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..20 {
            let round = sampler.sample_round(&mut rng);
            let ids: Vec<u32> = round.iter().map(|o| o.class_id).collect();
            assert_eq!(ids, vec![0, 1, 2]);

            for o in &round {
                assert!(cfg.scale_factors.values().contains(&o.scale));
                let expected = [50, 40].map(|side| scaled_size(side, side, o.scale));
                assert!(expected.contains(&o.image.dimensions()));
                assert!((10..20).contains(&o.jitter.0) && (10..20).contains(&o.jitter.1));

                let packed = o.pack_size();
                assert_eq!(packed.w, o.image.width() + o.jitter.0);
                assert_eq!(packed.h, o.image.height() + o.jitter.1);
            }
        }
    }

    #[test]
    fn same_seed_same_round() {
        let mut classes = BTreeMap::new();
        classes.insert(0, vec![object(0, 30), object(0, 31), object(0, 32)]);
        let sampler = ObjectSampler::from_objects(classes, &cfg(1)).unwrap();

        let a = sampler.sample_round(&mut SmallRng::seed_from_u64(9));
        let b = sampler.sample_round(&mut SmallRng::seed_from_u64(9));
        assert_eq!(a[0].image.dimensions(), b[0].image.dimensions());
        assert_eq!(a[0].jitter, b[0].jitter);
        assert_eq!(a[0].scale, b[0].scale);
    }
}
