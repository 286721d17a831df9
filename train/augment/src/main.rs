use std::path::PathBuf;

use anyhow::Context;
use augment::{
    AugmentCfg, AugmentError, BatchDriver, LabelFormat, LabelNames, PackerKind, SourceLayout,
    logging::setup_cli_logging,
};
use clap::{CommandFactory, Parser};
use tracing::info;

/// Packs random object cutouts onto backgrounds and writes images, labels and
/// a manifest of the generated images.
#[derive(Parser, Debug)]
#[command(name = "euclidaug", version)]
struct Args {
    /// Object images: `{class}.png` files or `{class}/` subdirectories
    objects: PathBuf,

    /// Background `.png` images
    backgrounds: PathBuf,

    /// File that receives one generated image path per line
    manifest: PathBuf,

    /// JSON file overriding the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<LabelFormat>,

    /// Write class ids or class names in the label files
    #[arg(long, value_enum)]
    names: Option<LabelNames>,

    #[arg(long, value_enum)]
    layout: Option<SourceLayout>,

    #[arg(long, value_enum)]
    packer: Option<PackerKind>,

    /// Base seed; every round derives its own generator from it
    #[arg(long)]
    seed: Option<u64>,

    /// Also write copies with the placed boxes outlined
    #[arg(long)]
    preview: bool,

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
    if let Some(format) = args.format {
        cfg.label_format = format;
    }
    if let Some(names) = args.names {
        cfg.label_names = names;
    }
    if let Some(layout) = args.layout {
        cfg.layout = layout;
    }
    if let Some(packer) = args.packer {
        cfg.packer = packer;
    }
    cfg.preview |= args.preview;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        canvas = %format!("{}x{}", cfg.width, cfg.height),
        classes = cfg.num_classes,
        format = ?cfg.label_format,
        "euclidaug"
    );

    let mut driver = match BatchDriver::new(cfg, &args.objects, &args.backgrounds) {
        Ok(driver) => driver,
        Err(e) => {
            if matches!(
                e,
                AugmentError::Configuration(_) | AugmentError::EmptyClass { .. }
            ) {
                eprintln!("{}", Args::command().render_usage());
            }
            return Err(anyhow::Error::new(e).context("failed to prepare the batch"));
        }
    };
    driver
        .run(&args.manifest, seed)
        .context("batch aborted")?;

    Ok(())
}
