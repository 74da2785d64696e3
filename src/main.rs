use clap::Parser;
use deck_sheet::config::{self, ConfigError, SheetConfig};
use deck_sheet::{combine, output, scan};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; called a single time at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "deck-sheet")]
#[command(about = "Tile a folder of card images into deck sheets")]
#[command(long_about = "\
Tile a folder of card images into deck sheets

Combines every image in a folder into one or more PNG grid sheets for
Tabletop Simulator style custom decks: 10 cards per row and at most 5 rows
by default. More cards than fit on one sheet spill onto further sheets.

  Goblins/                  Goblins.png   (cards 1-50)
  ├── 001-grunt.png    →    Goblins1.png  (cards 51-100)
  ├── 002-shaman.png        Goblins2.png  ...
  └── ...

Cards are taken in file name order and must all be the same size as the
first one. Sheets wider than 4096 pixels are scaled down so the simulator
accepts them.

Flags are case-insensitive and may be written in the classic single-dash
form: -RowSize 7 -MaxRows 3 -MarginX 10 -MarginY 10.

If MarginX or MarginY are nonzero, that many pixels are removed from each
edge of every card before it is placed.

Run 'deck-sheet --gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Folder of card images
    #[arg(required_unless_present = "gen_config")]
    source: Option<PathBuf>,

    /// Folder to write sheets into [default: parent of the source folder]
    target: Option<PathBuf>,

    /// Cards per row [default: 10]
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    row_size: Option<u32>,

    /// Rows per sheet [default: 5]
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    max_rows: Option<u32>,

    /// Pixels trimmed from the left and right of each card [default: 0]
    #[arg(long, value_name = "PX", allow_hyphen_values = true)]
    margin_x: Option<u32>,

    /// Pixels trimmed from the top and bottom of each card [default: 0]
    #[arg(long, value_name = "PX", allow_hyphen_values = true)]
    margin_y: Option<u32>,

    /// TOML config file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write <name>.json describing every sheet
    #[arg(long)]
    manifest: bool,

    /// Print a stock config file with all options documented
    #[arg(long)]
    gen_config: bool,
}

/// Single-dash spellings accepted case-insensitively, and whether they take a value.
const LEGACY_FLAGS: &[(&str, &str, bool)] = &[
    ("-rowsize", "--row-size", true),
    ("-maxrows", "--max-rows", true),
    ("-marginx", "--margin-x", true),
    ("-marginy", "--margin-y", true),
    ("-config", "--config", true),
    ("-manifest", "--manifest", false),
    ("-genconfig", "--gen-config", false),
    ("-help", "--help", false),
];

/// Rewrite `-RowSize`-style flags into the long forms clap understands.
///
/// The token after a value-taking flag is left untouched so it is always
/// parsed as that flag's value.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut normalized = Vec::new();
    let mut value_next = false;
    for arg in args {
        if value_next {
            value_next = false;
            normalized.push(arg);
            continue;
        }
        let legacy = arg.to_str().and_then(|s| {
            let lower = s.to_ascii_lowercase();
            LEGACY_FLAGS.iter().find(|(from, _, _)| *from == lower)
        });
        match legacy {
            Some((_, long, takes_value)) => {
                value_next = *takes_value;
                normalized.push(OsString::from(*long));
            }
            None => normalized.push(arg),
        }
    }
    normalized
}

/// Stock defaults, then the config file, then command-line flags.
fn resolve_sheet_config(cli: &Cli) -> Result<SheetConfig, ConfigError> {
    let mut overlays = Vec::new();
    if let Some(path) = &cli.config {
        overlays.push(config::load_raw_config(path)?);
    }
    overlays.push(config::layout_overlay(
        cli.row_size,
        cli.max_rows,
        cli.margin_x,
        cli.margin_y,
    ));
    config::resolve_config(config::stock_defaults_value(), overlays)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let sheet_config = resolve_sheet_config(&cli)?;
    let source = cli.source.ok_or("Source folder not specified")?;
    let (target, target_defaulted) = match cli.target {
        Some(target) => (target, false),
        None => (scan::default_target(&source)?, true),
    };

    output::print_folders(&source, &target, target_defaulted);
    combine::prepare_folders(&source, &target, &mut |e| output::print_combine_event(&e))?;

    output::print_layout_header(&sheet_config);
    let manifest = combine::combine(&source, &target, &sheet_config, |e| {
        output::print_combine_event(&e)
    })?;

    if cli.manifest {
        let path = combine::write_manifest(&manifest)?;
        println!("Manifest: {}", path.display());
    }
    output::print_summary(&manifest);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
