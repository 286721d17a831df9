use crate::rect::{Placement, Size};

/// Guillotine packing over a list of disjoint free rectangles.
///
/// Inputs are taken largest area first. Each rectangle goes into the free
/// rectangle that leaves the least area over (ties broken by the smaller
/// leftover side), at its top-left corner. The rest of that free rectangle is
/// cut in two along the shorter leftover axis, so the free list always stays
/// disjoint from itself and from everything placed.
pub struct GuillotinePacking;

#[derive(Clone, Copy, Debug)]
struct FreeRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl FreeRect {
    fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
}

impl GuillotinePacking {
    pub fn pack(&mut self, bin: Size, sizes: &[Size]) -> Vec<Placement> {
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by(|&a, &b| sizes[b].area().cmp(&sizes[a].area()));

        let mut free = vec![FreeRect {
            x: 0,
            y: 0,
            w: bin.w,
            h: bin.h,
        }];
        let mut placed = Vec::with_capacity(sizes.len());

        for id in order {
            let s = sizes[id];
            if s.is_empty() {
                continue;
            }
            let Some(best) = Self::best_fit(&free, s) else {
                continue;
            };

            let f = free.remove(best);
            placed.push(Placement {
                id,
                x: f.x,
                y: f.y,
                w: s.w,
                h: s.h,
            });
            Self::split(&mut free, f, s);
        }

        placed.sort_by_key(|p| p.id);
        placed
    }

    fn best_fit(free: &[FreeRect], s: Size) -> Option<usize> {
        free.iter()
            .enumerate()
            .filter(|(_, f)| s.fits_in(f.size()))
            .min_by_key(|(_, f)| {
                let leftover_area = f.size().area() - s.area();
                let short_side = (f.w - s.w).min(f.h - s.h);
                (leftover_area, short_side)
            })
            .map(|(i, _)| i)
    }

    fn split(free: &mut Vec<FreeRect>, f: FreeRect, s: Size) {
        let rest_w = f.w - s.w;
        let rest_h = f.h - s.h;

        let (right, below) = if rest_w <= rest_h {
            (
                FreeRect { x: f.x + s.w, y: f.y, w: rest_w, h: s.h },
                FreeRect { x: f.x, y: f.y + s.h, w: f.w, h: rest_h },
            )
        } else {
            (
                FreeRect { x: f.x + s.w, y: f.y, w: rest_w, h: f.h },
                FreeRect { x: f.x, y: f.y + s.h, w: s.w, h: rest_h },
            )
        };

        for r in [right, below] {
            if !r.size().is_empty() {
                free.push(r);
            }
        }
    }
}
