use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use fallible_iterator::{FallibleIterator, IteratorExt};
use kao::{
    format::{self, TableFormat},
    grid::GRID_SIZE,
    portrait::{self, Composition, Placement, PortraitParts},
    rom, BaseAddr, Cell, HeadVariant, VariantTable,
};
use serde::Serialize;
use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Table file to read instead of the built-in one (.json or .js)
    #[arg(short, long, value_name = "FILE", conflicts_with = "rom")]
    table: Option<PathBuf>,

    /// Sangokushi (Japan) iNES image to extract tables from
    #[arg(short, long, value_name = "ROM")]
    rom: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List things within the variant table
    #[command(subcommand)]
    List(ListCommands),

    /// Print one head's arrangement grid
    Show {
        /// Head index
        idx: u32,
    },

    /// Load the table and report whether it is consistent
    Validate,

    /// Write the table into a file
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
        /// Directory to write the exported file into
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Show where every tile of a generic portrait comes from (needs --rom)
    Plan {
        /// Portrait number, 81..=254
        portrait: u32,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// List head variants
    Heads,
    /// List generic portraits and their parts (needs --rom)
    Portraits,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// JSON document → heads.json
    Json,
    /// Explorer data file → data.js
    Js,
    /// One row per head → heads.csv
    Csv,
    /// One row per generic portrait → portraits.csv (needs --rom)
    Portraits,
}

fn open_rom(path: &Path) -> anyhow::Result<BufReader<fs::File>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn open_table(cli: &Cli) -> anyhow::Result<VariantTable> {
    let table = match (&cli.table, &cli.rom) {
        (Some(path), _) => format::load(path)?,
        (None, Some(rom_path)) => rom::extract_table(open_rom(rom_path)?)?,
        (None, None) => VariantTable::builtin()?.clone(),
    };
    debug!(heads = table.head_variants().len(), "table loaded");
    Ok(table)
}

fn read_portraits(cli: &Cli) -> anyhow::Result<Vec<PortraitParts>> {
    let rom_path = cli
        .rom
        .as_deref()
        .ok_or(anyhow!("--rom is required for portrait commands"))?;
    Ok(portrait::read_component_table(open_rom(rom_path)?)?)
}

fn list_heads(table: &VariantTable) {
    for head in table.head_variants() {
        println!(
            "H{:02}  template T{:02}  {:>8}  {} tiles",
            head.idx,
            head.template,
            head.base_addr.to_string(),
            head.tile_count
        );
    }
    let counts = table.variant_counts();
    println!(
        "eyes: {}, noses: {}, mouths: {}",
        counts.eyes, counts.noses, counts.mouths
    );
}

fn list_portraits(parts: &[PortraitParts]) {
    for p in parts {
        println!(
            "P{:03}  cat {}  head H{:02}  eyes E{:02}  nose N{:02}  mouth M{:02}",
            p.portrait,
            p.category,
            p.head_idx(),
            p.feature_idx(kao::Feature::Eyes),
            p.feature_idx(kao::Feature::Nose),
            p.feature_idx(kao::Feature::Mouth),
        );
    }

    for spread in portrait::summarize(parts) {
        if let (Some(min), Some(max)) = (spread.min(), spread.max()) {
            let counts: Vec<String> = spread
                .counts
                .iter()
                .map(|(value, n)| format!("{value}:{n}"))
                .collect();
            println!("{:<5}  {min}-{max}  {}", spread.name, counts.join(" "));
        }
    }
}

fn show_head(head: &HeadVariant) {
    println!(
        "H{:02} template T{:02} base {} tiles {}",
        head.idx, head.template, head.base_addr, head.tile_count
    );
    for row in head.grid.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Cell::Tile(slot) => format!("{slot:>3}"),
                Cell::Gap => "  .".to_owned(),
            })
            .collect();
        println!("{}", line.join(""));
    }
}

fn show_plan(comp: &Composition) {
    println!("P{:03} → head H{:02}", comp.parts.portrait, comp.head);
    for ((row, col), placement) in comp.placements() {
        let source = match placement {
            Placement::Empty => "-".to_owned(),
            Placement::Head { slot, addr } => format!("head tile {slot} @ {addr}"),
            Placement::Feature {
                feature,
                variant,
                tile,
                addr,
            } => format!("{feature} {variant} tile {tile} @ {addr}"),
        };
        println!("({row},{col})  {source}");
    }
}

fn validate(cli: &Cli, table: &VariantTable) -> anyhow::Result<()> {
    info!(
        heads = table.head_variants().len(),
        "variant table is consistent"
    );
    if cli.rom.is_some() {
        let parts = read_portraits(cli)?;
        let plans: Vec<Composition> = parts
            .iter()
            .map(|p| p.resolve(table))
            .transpose_into_fallible()
            .collect()?;
        info!(portraits = plans.len(), "every portrait resolves");
    }
    Ok(())
}

fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = ["idx", "template", "baseAddr", "tileCount"]
        .into_iter()
        .map(String::from)
        .collect();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            header.push(format!("r{row}c{col}"));
        }
    }
    header
}

fn csv_record(head: &HeadVariant) -> Vec<String> {
    let mut record = vec![
        head.idx.to_string(),
        head.template.to_string(),
        head.base_addr.to_string(),
        head.tile_count.to_string(),
    ];
    record.extend(
        head.grid
            .cells()
            .map(|(_, cell)| cell.slot().map(|s| s.to_string()).unwrap_or_default()),
    );
    record
}

fn export_csv(table: &VariantTable, out_path: &Path) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_path(out_path)?;
    w.write_record(csv_header())?;
    for head in table.head_variants() {
        w.write_record(csv_record(head))?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct PortraitRow {
    portrait_index: u32,
    rom_offset: Option<BaseAddr>,
    cat: u8,
    head: u8,
    eye: u8,
    nose: u8,
    mouth: u8,
}

impl From<&PortraitParts> for PortraitRow {
    fn from(p: &PortraitParts) -> Self {
        Self {
            portrait_index: p.portrait,
            rom_offset: p.record_addr(),
            cat: p.category,
            head: p.head,
            eye: p.eyes,
            nose: p.nose,
            mouth: p.mouth,
        }
    }
}

fn export_portraits(parts: &[PortraitParts], out_path: &Path) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_path(out_path)?;
    for p in parts {
        w.serialize(PortraitRow::from(p))?;
    }
    w.flush()?;
    Ok(())
}

fn export(
    table: &VariantTable,
    parts: Option<&[PortraitParts]>,
    kind: ExportFormat,
    out_dir: &Path,
) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)?;

    let out_path = match kind {
        ExportFormat::Json => out_dir.join("heads").with_extension(TableFormat::Json.extension()),
        ExportFormat::Js => out_dir.join("data").with_extension(TableFormat::DataJs.extension()),
        ExportFormat::Csv => out_dir.join("heads.csv"),
        ExportFormat::Portraits => out_dir.join("portraits.csv"),
    };

    match kind {
        ExportFormat::Json | ExportFormat::Js => format::save(table, &out_path)?,
        ExportFormat::Csv => export_csv(table, &out_path)?,
        ExportFormat::Portraits => {
            let parts = parts.ok_or(anyhow!("--rom is required for portrait commands"))?;
            export_portraits(parts, &out_path)?
        }
    }

    println!("{}", out_path.to_string_lossy());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let table = open_table(&cli)?;

    match &cli.command {
        Commands::List(sub) => match sub {
            ListCommands::Heads => list_heads(&table),
            ListCommands::Portraits => list_portraits(&read_portraits(&cli)?),
        },
        Commands::Show { idx } => show_head(table.head(*idx)?),
        Commands::Validate => validate(&cli, &table)?,
        Commands::Export { format: kind, out_dir } => {
            let parts = match kind {
                ExportFormat::Portraits => Some(read_portraits(&cli)?),
                _ => None,
            };
            export(&table, parts.as_deref(), *kind, out_dir)?
        }
        Commands::Plan { portrait } => {
            let parts = read_portraits(&cli)?;
            let comp = portrait::find_portrait(&parts, *portrait)?.resolve(&table)?;
            show_plan(&comp);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_columns_line_up() {
        let table = VariantTable::builtin().unwrap();
        let head = table.head(8).unwrap();
        let header = csv_header();
        let record = csv_record(head);

        assert_eq!(header.len(), 4 + 36);
        assert_eq!(record.len(), header.len());
        assert_eq!(record[2], "0x1cc14");
        let col = |name: &str| header.iter().position(|h| h == name).unwrap();
        assert_eq!(record[col("r0c2")], "3");
        assert_eq!(record[col("r2c1")], "");
    }

    #[test]
    fn export_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = VariantTable::builtin().unwrap();
        export(table, None, ExportFormat::Csv, dir.path()).unwrap();

        let mut r = csv::Reader::from_path(dir.path().join("heads.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = r.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 20);
        assert_eq!(&rows[19][2], "0x1dc94");
    }

    #[test]
    fn export_js_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let table = VariantTable::builtin().unwrap();
        export(table, None, ExportFormat::Js, dir.path()).unwrap();
        assert_eq!(&format::load(dir.path().join("data.js")).unwrap(), table);
    }

    fn sample_parts() -> Vec<PortraitParts> {
        [(81, [0, 1, 2, 3, 4]), (82, [3, 0, 4, 4, 1]), (254, [2, 4, 1, 3, 0])]
            .into_iter()
            .map(|(portrait, [category, head, eyes, nose, mouth])| PortraitParts {
                portrait,
                category,
                head,
                eyes,
                nose,
                mouth,
            })
            .collect()
    }

    #[test]
    fn export_portraits_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = VariantTable::builtin().unwrap();
        let parts = sample_parts();
        export(table, Some(&parts), ExportFormat::Portraits, dir.path()).unwrap();

        let mut r = csv::Reader::from_path(dir.path().join("portraits.csv")).unwrap();
        assert_eq!(
            r.headers().unwrap(),
            vec!["portrait_index", "rom_offset", "cat", "head", "eye", "nose", "mouth"]
        );
        let rows: Vec<csv::StringRecord> = r.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["81", "0x1f034", "0", "1", "2", "3", "4"]);
        assert_eq!(rows[1], vec!["82", "0x1f039", "3", "0", "4", "4", "1"]);
        assert_eq!(&rows[2][1], "0x1f395");
    }

    #[test]
    fn export_portraits_needs_rom() {
        let dir = tempfile::tempdir().unwrap();
        let table = VariantTable::builtin().unwrap();
        assert!(export(table, None, ExportFormat::Portraits, dir.path()).is_err());
    }

    #[test]
    fn cli_rejects_table_with_rom() {
        assert!(Cli::try_parse_from([
            "kaotool", "--table", "a.json", "--rom", "b.nes", "validate"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["kaotool", "show", "3"]).is_ok());
    }
}
