use thiserror::Error;

use crate::{
    guillotine::GuillotinePacking,
    rect::{Placement, Size},
    shelf::ShelfPacking,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    #[error("bin must have a non-zero size, got {w}x{h}")]
    EmptyBin { w: u32, h: u32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kind {
    Shelf,
    #[default]
    Guillotine,
}

// Concrete strategies
enum PackerEnum {
    Shelf(ShelfPacking),
    Guillotine(GuillotinePacking),
}

// Abstract strategy
impl PackerEnum {
    fn pack(&mut self, bin: Size, sizes: &[Size]) -> Vec<Placement> {
        match self {
            PackerEnum::Shelf(a) => a.pack(bin, sizes),
            PackerEnum::Guillotine(a) => a.pack(bin, sizes),
        }
    }
}

/// Packs rectangles into one bin with the chosen strategy. Rotation is never
/// applied; the result holds one [`Placement`] per rectangle that fit, in
/// input order.
pub struct PackerEngine {
    alg: PackerEnum,
    bin: Size,
}

impl PackerEngine {
    pub fn new(kind: Kind, bin: Size) -> Result<Self, PackError> {
        if bin.is_empty() {
            return Err(PackError::EmptyBin { w: bin.w, h: bin.h });
        }
        Ok(Self {
            alg: match kind {
                Kind::Shelf => PackerEnum::Shelf(ShelfPacking),
                Kind::Guillotine => PackerEnum::Guillotine(GuillotinePacking),
            },
            bin,
        })
    }

    pub fn bin(&self) -> Size {
        self.bin
    }

    pub fn pack(&mut self, sizes: &[Size]) -> Vec<Placement> {
        self.alg.pack(self.bin, sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    fn random_sizes(rng: &mut SmallRng, n: usize, max: u32) -> Vec<Size> {
        (0..n)
            .map(|_| Size::new(rng.random_range(1..=max), rng.random_range(1..=max)))
            .collect()
    }

    fn assert_valid(bin: Size, sizes: &[Size], placed: &[Placement]) {
        for (i, p) in placed.iter().enumerate() {
            assert!(p.within(bin), "{p} leaves the {}x{} bin", bin.w, bin.h);
            assert_eq!((p.w, p.h), (sizes[p.id].w, sizes[p.id].h), "{p} was resized");
            for q in &placed[i + 1..] {
                assert!(!p.overlaps(q), "{p} overlaps {q}");
            }
        }
    }

    #[test]
    fn zero_bin_is_rejected() {
        assert_eq!(
            PackerEngine::new(Kind::Shelf, Size::new(0, 10)).err(),
            Some(PackError::EmptyBin { w: 0, h: 10 })
        );
    }

    #[test]
    fn random_inputs_never_overlap_or_leave_the_bin() {
        let bin = Size::new(416, 416);
        for kind in [Kind::Shelf, Kind::Guillotine] {
            let mut engine = PackerEngine::new(kind, bin).unwrap();
            for seed in 0..200 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let n = rng.random_range(1..40);
                let sizes = random_sizes(&mut rng, n, 180);
                let placed = engine.pack(&sizes);
                assert_valid(bin, &sizes, &placed);

                let mut ids: Vec<usize> = placed.iter().map(|p| p.id).collect();
                ids.dedup();
                assert_eq!(ids.len(), placed.len(), "duplicate ids for seed {seed}");
            }
        }
    }

    #[test]
    fn same_sizes_give_same_placements() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sizes = random_sizes(&mut rng, 25, 120);
        for kind in [Kind::Shelf, Kind::Guillotine] {
            let mut engine = PackerEngine::new(kind, Size::new(416, 416)).unwrap();
            assert_eq!(engine.pack(&sizes), engine.pack(&sizes));
        }
    }

    #[test]
    fn overflow_keeps_what_fits() {
        let sizes = vec![Size::new(70, 70); 26];
        let mut engine = PackerEngine::new(Kind::Guillotine, Size::new(416, 416)).unwrap();
        // only a 5 x 5 grid of 70px cells fits in 416
        let placed = engine.pack(&sizes);
        assert_eq!(placed.len(), 25);
        assert_valid(engine.bin(), &sizes, &placed);
    }
}
