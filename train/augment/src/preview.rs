use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

use crate::geom::PlacementRect;

/// Copy of `image` with a two pixel outline around every placement.
pub fn draw_placements(image: &RgbaImage, placements: &[PlacementRect]) -> RgbaImage {
    let mut out = image.clone();
    for r in placements {
        let color = class_color(r.class_id);
        draw_hollow_rect_mut(
            &mut out,
            Rect::at(r.left as i32, r.top as i32).of_size(r.width(), r.height()),
            color,
        );
        if r.width() > 2 && r.height() > 2 {
            draw_hollow_rect_mut(
                &mut out,
                Rect::at(r.left as i32 + 1, r.top as i32 + 1).of_size(r.width() - 2, r.height() - 2),
                color,
            );
        }
    }
    out
}

// green steps by 25 per class so neighbouring classes are told apart
fn class_color(class_id: u32) -> Rgba<u8> {
    let green = ((128 + 25 * class_id as u64) % 255) as u8;
    Rgba([128, green, 128, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_only_touches_the_border() {
        let bg = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        let out = draw_placements(&bg, &[PlacementRect::new(1, 10, 10, 30, 30)]);

        assert_eq!(out.get_pixel(10, 10), &class_color(1));
        assert_eq!(out.get_pixel(11, 20), &class_color(1));
        assert_eq!(out.get_pixel(20, 20), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
        assert_eq!(bg.get_pixel(10, 10), &Rgba([0, 0, 0, 255]));
    }
}
