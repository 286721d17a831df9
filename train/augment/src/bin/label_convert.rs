use std::path::PathBuf;

use anyhow::Context;
use augment::{
    AugmentCfg, LabelFormat, LabelNames, convert::convert_dir, logging::setup_cli_logging,
};
use clap::Parser;

/// Converts every label file in a directory between the normalized and the
/// absolute-corner formats. Results go to `<dir>/ConvertedLabelData/`.
#[derive(Parser, Debug)]
#[command(name = "label-convert", version)]
struct Args {
    /// Directory holding `.txt` label files
    input: PathBuf,

    /// Force the output format; by default each line flips to the other one
    #[arg(long, value_enum)]
    to: Option<LabelFormat>,

    /// Width of the labelled images
    #[arg(long, default_value_t = 416)]
    width: u32,

    /// Height of the labelled images
    #[arg(long, default_value_t = 416)]
    height: u32,

    /// JSON config supplying class count and names
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    names: Option<LabelNames>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_cli_logging(args.verbose)?;

    let mut cfg = match &args.config {
        Some(path) => AugmentCfg::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AugmentCfg::default(),
    };
    if let Some(names) = args.names {
        cfg.label_names = names;
    }
    cfg.validate()?;
    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "image size must be non-zero, got {}x{}",
        args.width,
        args.height
    );

    convert_dir(&args.input, &cfg, (args.width, args.height), args.to)
        .with_context(|| format!("failed to convert labels in {}", args.input.display()))?;
    Ok(())
}
