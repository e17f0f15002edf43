use clap::Parser;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use image_to_bead_pattern_wasm::{
    ActiveSelection, CustomSelection, FileStorage, PaletteStore, TableSource, bead_pattern_bytes,
    materials, presets,
};
use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Turn images into bead patterns with a materials list (native wrapper).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pattern width in beads
    #[arg(short = 'W', long, default_value_t = 50)]
    width: u32,

    /// Pattern height in beads. If omitted, the image aspect ratio is kept.
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Preset kit to restrict colors to (e.g. basic_10, standard_20)
    #[arg(short, long, conflicts_with_all = ["colors", "custom"])]
    preset: Option<String>,

    /// Comma-separated list of bead codes to restrict colors to
    #[arg(short, long, conflicts_with = "custom")]
    colors: Option<String>,

    /// Use the saved custom selection
    #[arg(long)]
    custom: bool,

    /// Save --colors as the custom selection
    #[arg(long, requires = "colors")]
    save_custom: bool,

    /// Keep only the N most used colors (0 = unlimited)
    #[arg(short = 'k', long, default_value_t = 0)]
    max_colors: usize,

    /// JSON file mapping bead codes to hex colors (defaults to the bundled MARD table)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Directory holding the saved custom selection
    #[arg(long, default_value = ".")]
    selection_dir: PathBuf,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(long, default_value = "pattern_")]
    prefix: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let source = match &args.table {
        Some(path) => TableSource::File(path.clone()),
        None => TableSource::Bundled,
    };
    let mut store = PaletteStore::new(source);
    store.load().context("loading bead color table")?;

    let mut custom = CustomSelection::load(FileStorage::in_dir(&args.selection_dir));

    if let Some(list) = &args.colors {
        let codes: Vec<String> = list
            .split(',')
            .map(|x| x.trim().to_uppercase())
            .filter(|x| !x.is_empty())
            .collect();
        store.set_active_subset(Some(codes.as_slice()))?;
        if args.save_custom {
            custom.replace(&codes);
            custom.save().context("saving custom selection")?;
        }
    } else if let Some(id) = &args.preset {
        let Some(kit) = presets::preset(id) else {
            let known: Vec<&str> = presets::PRESETS.iter().map(|p| p.id).collect();
            bail!("unknown preset {id:?}, expected one of {}", known.join(", "));
        };
        store.apply_preset(kit)?;
    } else if args.custom {
        if custom.is_empty() {
            bail!("no custom selection saved in {}", args.selection_dir.display());
        }
        store.set_active_subset(Some(custom.codes()))?;
    } else {
        let default = presets::preset(presets::DEFAULT_PRESET).context("default preset missing")?;
        match store.apply_startup(&custom, default)? {
            ActiveSelection::Custom => println!("Using saved custom selection ({} colors)", custom.len()),
            ActiveSelection::Preset(p) => println!("Using preset {}", p.name),
        }
    }
    println!("Available colors: {}", store.active_colors()?.len());

    let cap = NonZeroUsize::new(args.max_colors);

    for input in &args.inputs {
        let bytes = fs::read(input)?;
        let pattern = bead_pattern_bytes(&bytes, args.width, args.height, &store, cap)
            .context("bead pattern processing failed")?;
        let list = materials(&pattern);

        let out_path = if let Some(dir) = &args.out_dir {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            dir.join(format!("{stem}.json"))
        } else {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            PathBuf::from(format!("{}{}.json", args.prefix, stem))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let doc = json!({ "pattern": pattern, "materials": list });
        fs::write(&out_path, serde_json::to_string_pretty(&doc)?)?;

        println!(
            "Saved → {} ({}x{}, {} beads, {} colors)",
            out_path.display(),
            pattern.width(),
            pattern.height(),
            list.total,
            list.lines.len()
        );
        for line in &list.lines {
            println!("  {:<5} {:<8} {}", line.code, line.hex, line.count);
        }
    }

    Ok(())
}
