//! Text encodings for bounding boxes.
//!
//! `Yolo` lines hold the box center and size as fractions of the image, seven
//! decimals each. `Kitti` lines hold absolute corners with two decimals,
//! surrounded by zeroed placeholders for truncation, occlusion, observation
//! angle, 3D dimensions, location and rotation.

use crate::{
    config::{AugmentCfg, LabelFormat},
    error::{AugmentError, Result},
    geom::PlacementRect,
};

/// A box in absolute pixel corners, as read back from a label line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRecord {
    pub class_id: u32,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Format the line was written in.
    pub format: LabelFormat,
}

/// Encodes one placement. `class` is the text for the class column.
pub fn encode(format: LabelFormat, image_size: (u32, u32), class: &str, rect: &PlacementRect) -> String {
    encode_corners(
        format,
        image_size,
        class,
        [rect.left, rect.top, rect.right, rect.bottom].map(f64::from),
    )
}

/// Encodes `[left, top, right, bottom]`.
pub fn encode_corners(
    format: LabelFormat,
    (width, height): (u32, u32),
    class: &str,
    [left, top, right, bottom]: [f64; 4],
) -> String {
    match format {
        LabelFormat::Yolo => {
            let (w, h) = (width as f64, height as f64);
            let cx = (left + right) / (2.0 * w);
            let cy = (top + bottom) / (2.0 * h);
            let bw = (right - left) / w;
            let bh = (bottom - top) / h;
            format!("{class} {cx:.7} {cy:.7} {bw:.7} {bh:.7}\n")
        }
        LabelFormat::Kitti => format!(
            "{class} 0.0 0 0.0 {left:.2} {top:.2} {right:.2} {bottom:.2} 0.0 0.0 0.0 0.0 0.0 0.0 0.0\n"
        ),
    }
}

/// Label file contents for one composed image, one line per placement.
pub fn encode_all(cfg: &AugmentCfg, placements: &[PlacementRect]) -> Vec<String> {
    placements
        .iter()
        .map(|r| {
            encode(
                cfg.label_format,
                (cfg.width, cfg.height),
                &cfg.class_label(r.class_id),
                r,
            )
        })
        .collect()
}

/// Parses one label line; the format is told apart by field count (five for
/// `Yolo`, at least eight for `Kitti`). Blank lines give `None`. Normalized
/// boxes are mapped back to pixels of `image_size` and rounded.
pub fn decode_line(
    line: &str,
    line_no: usize,
    cfg: &AugmentCfg,
    (width, height): (u32, u32),
) -> Result<Option<LabelRecord>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let err = |message: String| AugmentError::Label {
        line: line_no,
        message,
    };
    let num = |i: usize| -> Result<f64> {
        fields[i]
            .parse::<f64>()
            .map_err(|e| err(format!("field {} '{}': {e}", i + 1, fields[i])))
    };
    let class_id = cfg
        .resolve_class(fields[0])
        .ok_or_else(|| err(format!("unknown class '{}'", fields[0])))?;

    let record = match fields.len() {
        5 => {
            let (w, h) = (width as f64, height as f64);
            let (cx, cy, bw, bh) = (num(1)? * w, num(2)? * h, num(3)? * w, num(4)? * h);
            LabelRecord {
                class_id,
                left: (cx - bw / 2.0).round(),
                top: (cy - bh / 2.0).round(),
                right: (cx + bw / 2.0).round(),
                bottom: (cy + bh / 2.0).round(),
                format: LabelFormat::Yolo,
            }
        }
        n if n >= 8 => LabelRecord {
            class_id,
            left: num(4)?,
            top: num(5)?,
            right: num(6)?,
            bottom: num(7)?,
            format: LabelFormat::Kitti,
        },
        n => return Err(err(format!("expected 5 or at least 8 fields, found {n}"))),
    };

    if record.left > record.right || record.top > record.bottom {
        return Err(err("box corners are inverted".to_string()));
    }
    Ok(Some(record))
}
