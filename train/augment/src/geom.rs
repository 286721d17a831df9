/// Where one object ended up on the composed canvas, in pixels. `right` and
/// `bottom` are exclusive, so `right - left` is the drawn width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRect {
    pub class_id: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PlacementRect {
    pub fn new(class_id: u32, left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            class_id,
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Clamp to a `width x height` canvas. `None` when nothing is left.
    pub fn clamp_to(self, width: u32, height: u32) -> Option<Self> {
        let r = Self {
            right: self.right.min(width),
            bottom: self.bottom.min(height),
            ..self
        };
        (r.left < r.right && r.top < r.bottom).then_some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_trims_overhang() {
        let r = PlacementRect::new(1, 400, 10, 430, 40).clamp_to(416, 416).unwrap();
        assert_eq!((r.left, r.right, r.width()), (400, 416, 16));
        assert_eq!(r.height(), 30);
    }

    #[test]
    fn clamp_drops_rect_outside_canvas() {
        assert_eq!(PlacementRect::new(0, 416, 0, 420, 10).clamp_to(416, 416), None);
    }
}
