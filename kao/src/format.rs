//! Persisted forms of the variant table.
//!
//! Two forms exist: a JSON document (`{"heads": [...], "counts": {...}}`) and
//! the JavaScript data file the portrait explorer page consumes. Both are
//! validated on the way in.

use crate::{
    error::KaoError,
    grid::Cell,
    table::{HeadRecord, HeadVariant, VariantCounts, VariantTable},
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::debug;

lazy_static! {
    static ref HEADS_DECL_REGEX: Regex =
        Regex::new(r"(?s)const\s+(?:HEADS|GROUPS)\s*=\s*(\[.*?\])\s*;").unwrap();
    static ref COUNTS_DECL_REGEX: Regex =
        Regex::new(r"(?s)const\s+VARIANT_COUNTS\s*=\s*(\{.*?\})\s*;").unwrap();
    static ref LINE_COMMENT_REGEX: Regex = Regex::new(r"(?m)^\s*//.*$").unwrap();
    static ref BARE_KEY_REGEX: Regex = Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap();
    static ref TRAILING_COMMA_REGEX: Regex = Regex::new(r",(\s*[\]}])").unwrap();
}

const DATA_JS_BANNER: &str = "// Auto-generated data for variant explorer";

#[derive(Serialize)]
struct TableDocRef<'a> {
    heads: &'a [HeadVariant],
    counts: VariantCounts,
}

#[derive(Deserialize)]
struct TableDoc {
    heads: Vec<HeadRecord>,
    counts: VariantCounts,
}

pub fn from_json_str(s: &str) -> Result<VariantTable, KaoError> {
    let doc: TableDoc = serde_json::from_str(s).map_err(KaoError::Json)?;
    VariantTable::new(doc.heads, doc.counts)
}

pub fn from_json_reader(r: impl io::Read) -> Result<VariantTable, KaoError> {
    let doc: TableDoc = serde_json::from_reader(r).map_err(KaoError::Json)?;
    VariantTable::new(doc.heads, doc.counts)
}

pub fn to_json(table: &VariantTable) -> Result<String, KaoError> {
    let doc = TableDocRef {
        heads: table.head_variants(),
        counts: table.variant_counts(),
    };
    serde_json::to_string_pretty(&doc).map_err(KaoError::JsonWrite)
}

/// Turns a JavaScript object/array literal of the kind the generator writes
/// into JSON: comments dropped, bare keys quoted, trailing commas removed.
fn js_literal_to_json(literal: &str) -> String {
    let s = LINE_COMMENT_REGEX.replace_all(literal, "");
    let s = BARE_KEY_REGEX.replace_all(&s, "$1\"$2\":");
    TRAILING_COMMA_REGEX.replace_all(&s, "$1").into_owned()
}

pub fn from_data_js(source: &str) -> Result<VariantTable, KaoError> {
    let heads = HEADS_DECL_REGEX
        .captures(source)
        .ok_or(KaoError::DataJsMissing("HEADS"))?;
    let counts = COUNTS_DECL_REGEX
        .captures(source)
        .ok_or(KaoError::DataJsMissing("VARIANT_COUNTS"))?;

    let heads: Vec<HeadRecord> = serde_json::from_str(&js_literal_to_json(&heads[1]))
        .map_err(|e| KaoError::DataJs("HEADS", e))?;
    let counts: VariantCounts = serde_json::from_str(&js_literal_to_json(&counts[1]))
        .map_err(|e| KaoError::DataJs("VARIANT_COUNTS", e))?;
    debug!(heads = heads.len(), "parsed data file");

    VariantTable::new(heads, counts)
}

fn grid_js(head: &HeadVariant) -> String {
    let rows: Vec<String> = head
        .grid
        .rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Tile(slot) => slot.to_string(),
                    Cell::Gap => "null".to_owned(),
                })
                .collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

/// Renders the table as the explorer's data file, byte-identical to what the
/// extraction script produces for the same data.
pub fn to_data_js(table: &VariantTable) -> String {
    let mut out = String::new();
    out.push_str(DATA_JS_BANNER);
    out.push_str("\n\nconst HEADS = [\n");
    for head in table.head_variants() {
        out.push_str(&format!(
            "  {{ idx: {}, template: {}, baseAddr: \"{}\", tileCount: {}, grid: {} }},\n",
            head.idx,
            head.template,
            head.base_addr,
            head.tile_count,
            grid_js(head)
        ));
    }
    out.push_str("];\n\n");

    let counts = table.variant_counts();
    out.push_str(&format!(
        "const VARIANT_COUNTS = {{ eyes: {}, noses: {}, mouths: {} }};\n",
        counts.eyes, counts.noses, counts.mouths
    ));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    DataJs,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, KaoError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("js") => Ok(Self::DataJs),
            _ => Err(KaoError::UnknownFormat(
                path.to_string_lossy().into_owned().into_boxed_str(),
            )),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::DataJs => "js",
        }
    }

    pub fn render(self, table: &VariantTable) -> Result<String, KaoError> {
        match self {
            Self::Json => to_json(table),
            Self::DataJs => Ok(to_data_js(table)),
        }
    }
}

/// Reads and validates a table file, picking the format from its extension.
pub fn load(path: impl AsRef<Path>) -> Result<VariantTable, KaoError> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "loading variant table");

    match format {
        TableFormat::Json => from_json_reader(io::BufReader::new(
            fs::File::open(path).map_err(KaoError::IO)?,
        )),
        TableFormat::DataJs => from_data_js(&fs::read_to_string(path).map_err(KaoError::IO)?),
    }
}

pub fn save(table: &VariantTable, path: impl AsRef<Path>) -> Result<(), KaoError> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    fs::write(path, format.render(table)?).map_err(KaoError::IO)
}
