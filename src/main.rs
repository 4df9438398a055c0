#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
mod gui;
mod ui;
mod wad;

use clap::Parser;
use std::path::PathBuf;

use wad::MergeOptions;

#[derive(Debug, Parser)]
#[command(name = "wadmerge", version, about = "Batch merger for Doom-family WAD archives")]
struct Cli {
    /// Input archives, merged in the order given (at least two).
    inputs: Vec<PathBuf>,

    /// Output archive.
    #[arg(short, long, default_value = "merged.wad")]
    output: PathBuf,

    /// Overwrite the output without asking.
    #[arg(short = 'w', long)]
    overwrite: bool,

    /// Keep PP lumps that no merged texture references.
    #[arg(long)]
    no_filter_patches: bool,

    /// Do not concatenate known text lumps (DECORATE, MAPINFO, ...).
    #[arg(long)]
    no_merge_text: bool,

    /// Do not sort lumps inside each namespace.
    #[arg(long)]
    no_sort_ns: bool,

    /// Do not sort maps by name.
    #[arg(long)]
    no_sort_maps: bool,

    /// Do not sort merged text lumps by name.
    #[arg(long)]
    no_sort_text: bool,

    /// Sort textures by name (null textures stay pinned first).
    #[arg(long)]
    sort_textures: bool,

    /// Sort loose lumps by name.
    #[arg(long)]
    sort_loose: bool,

    /// Write a column-aligned duplicate report here.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print license text and exit.
    #[arg(short = 'l', long)]
    license: bool,

    /// Launch the native GUI.
    #[cfg(feature = "gui")]
    #[arg(long)]
    gui: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();

    if cli.license {
        print!("{}", ui::LICENSE_TEXT);
        return;
    }

    #[cfg(feature = "gui")]
    if cli.gui {
        if let Err(e) = gui::run() {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if cli.inputs.len() < 2 {
        eprintln!("error: need at least two input archives");
        std::process::exit(1);
    }
    for path in &cli.inputs {
        if !path.is_file() {
            eprintln!("error: no such file: {}", path.display());
            std::process::exit(1);
        }
    }

    if cli.output.exists() && !cli.overwrite {
        match ui::confirm_overwrite(&cli.output) {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("not overwriting {}", cli.output.display());
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }

    let opts = MergeOptions {
        output: cli.output,
        filter_patches: !cli.no_filter_patches,
        merge_text: !cli.no_merge_text,
        sort_ns: !cli.no_sort_ns,
        sort_maps: !cli.no_sort_maps,
        sort_textures: cli.sort_textures,
        sort_text: !cli.no_sort_text,
        sort_loose: cli.sort_loose,
        report: cli.report,
    };

    match wad::merge(&cli.inputs, &opts) {
        Ok(summary) => {
            println!(
                "wrote {} ({} lumps from {} archives, {} duplicates resolved)",
                opts.output.display(),
                summary.lumps_written,
                summary.inputs_merged,
                summary.log.len()
            );
            if summary.inputs_skipped > 0 {
                eprintln!("skipped {} unreadable archive(s)", summary.inputs_skipped);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
