use crate::rect::{Placement, Size};

/// First-fit shelf packing. Rectangles are taken tallest first; each one goes
/// onto the first shelf with enough height and remaining width, otherwise a
/// new shelf is opened under the last one.
pub struct ShelfPacking;

struct Shelf {
    y: u32,
    height: u32,
    used: u32,
}

impl ShelfPacking {
    pub fn pack(&mut self, bin: Size, sizes: &[Size]) -> Vec<Placement> {
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        // stable, so equal heights keep input order
        order.sort_by(|&a, &b| sizes[b].h.cmp(&sizes[a].h));

        let mut shelves: Vec<Shelf> = Vec::new();
        let mut top: u32 = 0;
        let mut placed = Vec::with_capacity(sizes.len());

        for id in order {
            let s = sizes[id];
            if s.is_empty() || !s.fits_in(bin) {
                continue;
            }

            if let Some(shelf) = shelves
                .iter_mut()
                .find(|sh| s.h <= sh.height && bin.w - sh.used >= s.w)
            {
                placed.push(Placement {
                    id,
                    x: shelf.used,
                    y: shelf.y,
                    w: s.w,
                    h: s.h,
                });
                shelf.used += s.w;
                continue;
            }

            if bin.h - top >= s.h {
                shelves.push(Shelf {
                    y: top,
                    height: s.h,
                    used: s.w,
                });
                placed.push(Placement {
                    id,
                    x: 0,
                    y: top,
                    w: s.w,
                    h: s.h,
                });
                top += s.h;
            }
        }

        placed.sort_by_key(|p| p.id);
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_a_row_then_opens_a_new_shelf() {
        let sizes = [Size::new(40, 30), Size::new(40, 20), Size::new(40, 30)];
        let placed = ShelfPacking.pack(Size::new(100, 100), &sizes);

        assert_eq!(placed.len(), 3);
        // tallest two share the first shelf
        assert_eq!((placed[0].x, placed[0].y), (0, 0));
        assert_eq!((placed[2].x, placed[2].y), (40, 0));
        assert_eq!((placed[1].x, placed[1].y), (0, 30));
    }

    #[test]
    fn drops_what_does_not_fit() {
        let sizes = [Size::new(60, 60), Size::new(60, 60), Size::new(120, 10)];
        let placed = ShelfPacking.pack(Size::new(100, 100), &sizes);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].id, 0);
    }

    #[test]
    fn zero_sized_rectangles_are_skipped() {
        let placed = ShelfPacking.pack(Size::new(10, 10), &[Size::new(0, 5), Size::new(5, 5)]);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].id, 1);
    }
}
