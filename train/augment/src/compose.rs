use std::path::Path;

use image::{RgbaImage, imageops, imageops::FilterType};
use packer::{PackerEngine, Size};
use rand::Rng;
use tracing::warn;

use crate::{
    config::{AugmentCfg, Candidates},
    error::{AugmentError, Result},
    geom::PlacementRect,
    sampler::ScaledObject,
};

/// A decoded background. Never drawn on; each round works on its own copy.
pub struct BackgroundImage {
    pub stem: String,
    pub image: RgbaImage,
}

impl BackgroundImage {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| AugmentError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { stem, image })
    }

    /// Fresh copy at the canvas size.
    pub fn working_copy(&self, width: u32, height: u32) -> RgbaImage {
        if self.image.dimensions() == (width, height) {
            self.image.clone()
        } else {
            imageops::resize(&self.image, width, height, FilterType::Triangle)
        }
    }
}

pub struct Composition {
    pub image: RgbaImage,
    pub placements: Vec<PlacementRect>,
    /// Objects the packer could not fit this round.
    pub dropped: usize,
}

pub struct CompositionEngine {
    packer: PackerEngine,
    boundary: [u32; 2],
    alphas: Candidates<f32>,
}

impl CompositionEngine {
    pub fn new(cfg: &AugmentCfg) -> Result<Self> {
        let packer = PackerEngine::new(cfg.packer.into(), Size::new(cfg.width, cfg.height))
            .map_err(|e| AugmentError::Configuration(e.to_string()))?;
        Ok(Self {
            packer,
            boundary: cfg.boundary,
            alphas: cfg.blend_alphas.clone(),
        })
    }

    pub fn canvas(&self) -> Size {
        self.packer.bin()
    }

    /// Packs `objects`, then blends each placed one onto a copy of
    /// `background` at its packed corner plus the boundary offset.
    pub fn compose_one<R: Rng + ?Sized>(
        &mut self,
        objects: &[ScaledObject],
        background: &BackgroundImage,
        rng: &mut R,
    ) -> Composition {
        let canvas = self.canvas();
        let sizes: Vec<Size> = objects.iter().map(ScaledObject::pack_size).collect();
        let placed = self.packer.pack(&sizes);

        let mut image = background.working_copy(canvas.w, canvas.h);
        let mut placements = Vec::with_capacity(placed.len());

        for p in &placed {
            let obj = &objects[p.id];
            let left = p.x.saturating_add(self.boundary[0]);
            let top = p.y.saturating_add(self.boundary[1]);
            let Some(rect) = PlacementRect::new(
                obj.class_id,
                left,
                top,
                left.saturating_add(obj.image.width()),
                top.saturating_add(obj.image.height()),
            )
            .clamp_to(canvas.w, canvas.h) else {
                continue;
            };

            let alpha = self.alphas.sample(rng);
            blend_into(&mut image, &obj.image, &rect, alpha);
            placements.push(rect);
        }

        let dropped = objects.len() - placements.len();
        if dropped > 0 {
            warn!(
                requested = objects.len(),
                dropped,
                "not every object fit on the canvas, round continues without them"
            );
        }

        Composition {
            image,
            placements,
            dropped,
        }
    }
}

/// Crops `canvas` at `rect`, mixes `object` in with weight `alpha` (scaled by
/// the object's own alpha channel) and pastes the patch back.
pub fn blend_into(canvas: &mut RgbaImage, object: &RgbaImage, rect: &PlacementRect, alpha: f32) {
    let mut patch =
        imageops::crop_imm(&*canvas, rect.left, rect.top, rect.width(), rect.height()).to_image();

    for (x, y, px) in patch.enumerate_pixels_mut() {
        let src = object.get_pixel(x, y);
        let a = alpha * src[3] as f32 / 255.0;
        for c in 0..4 {
            px[c] = (px[c] as f32 * (1.0 - a) + src[c] as f32 * a).round() as u8;
        }
    }

    imageops::replace(canvas, &patch, rect.left as i64, rect.top as i64);
}
