//! Rewrites existing label files from one format into the other.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    config::{AugmentCfg, LabelFormat},
    error::{AugmentError, Result},
    label::{decode_line, encode_corners},
};

/// Folder created inside the input directory for converted files.
pub const CONVERTED_DIR: &str = "ConvertedLabelData";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub files: usize,
    pub boxes: usize,
    pub out_dir: PathBuf,
}

/// Target for a line read in `from`: the forced format, or else the other one.
fn target_for(from: LabelFormat, forced: Option<LabelFormat>) -> LabelFormat {
    forced.unwrap_or(match from {
        LabelFormat::Yolo => LabelFormat::Kitti,
        LabelFormat::Kitti => LabelFormat::Yolo,
    })
}

/// Converts the contents of one label file. Blank lines are dropped.
pub fn convert_text(
    text: &str,
    cfg: &AugmentCfg,
    image_size: (u32, u32),
    forced: Option<LabelFormat>,
) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let Some(rec) = decode_line(line, i + 1, cfg, image_size)? else {
            continue;
        };
        out.push(encode_corners(
            target_for(rec.format, forced),
            image_size,
            &cfg.class_label(rec.class_id),
            [rec.left, rec.top, rec.right, rec.bottom],
        ));
    }
    Ok(out)
}

pub fn convert_file(
    input: &Path,
    output: &Path,
    cfg: &AugmentCfg,
    image_size: (u32, u32),
    forced: Option<LabelFormat>,
) -> Result<usize> {
    let text = fs::read_to_string(input).map_err(|e| AugmentError::io(input, e))?;
    let lines = convert_text(&text, cfg, image_size, forced).map_err(|e| match e {
        AugmentError::Label { line, message } => AugmentError::Label {
            line,
            message: format!("{}: {message}", input.display()),
        },
        other => other,
    })?;
    fs::write(output, lines.concat()).map_err(|e| AugmentError::io(output, e))?;
    Ok(lines.len())
}

/// Converts every `.txt` file directly inside `input_dir` into
/// `input_dir/ConvertedLabelData/`, keeping file names.
pub fn convert_dir(
    input_dir: &Path,
    cfg: &AugmentCfg,
    image_size: (u32, u32),
    forced: Option<LabelFormat>,
) -> Result<ConvertSummary> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)
        .map_err(|e| AugmentError::io(input_dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(AugmentError::Configuration(format!(
            "no .txt label files found in '{}'",
            input_dir.display()
        )));
    }

    let out_dir = input_dir.join(CONVERTED_DIR);
    fs::create_dir_all(&out_dir).map_err(|e| AugmentError::io(&out_dir, e))?;

    let mut summary = ConvertSummary {
        out_dir,
        ..Default::default()
    };
    for file in &files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let boxes = convert_file(file, &summary.out_dir.join(name), cfg, image_size, forced)?;
        debug!(file = %file.display(), boxes, "converted");
        summary.files += 1;
        summary.boxes += boxes;
    }
    info!(
        files = summary.files,
        boxes = summary.boxes,
        out = %summary.out_dir.display(),
        "labels converted"
    );
    Ok(summary)
}
