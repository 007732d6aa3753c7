use crate::addr::BaseAddr;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KaoError {
    #[error("Base address {0:?} is not in canonical 0x-lowercase-hex form")]
    AddrFormat(Box<str>),
    #[error("Base address {0:?} does not fit into 32 bits")]
    AddrRange(Box<str>),

    #[error("Head {idx} grid has {rows} rows, expected 6")]
    GridRows { idx: u32, rows: usize },
    #[error("Head {idx} grid row {row} has {len} cells, expected 6")]
    GridRowLen { idx: u32, row: usize, len: usize },
    #[error("Head {idx} cell ({row},{col}) references tile {slot}, but only {tile_count} tiles exist")]
    TileOutOfRange {
        idx: u32,
        row: usize,
        col: usize,
        slot: i64,
        tile_count: u32,
    },
    #[error("Head {idx} block of {tile_count} tiles at {base_addr} runs past the 32-bit address space")]
    TileBlockOverflow {
        idx: u32,
        base_addr: BaseAddr,
        tile_count: u32,
    },
    #[error("Head idx {0} appears more than once")]
    DuplicateIdx(u32),
    #[error("Head idx {idx} is out of the dense range 0..{len}")]
    SparseIdx { idx: u32, len: usize },
    #[error("Head {0} is not in the table")]
    HeadNotFound(u32),
    #[error("{pool} variant {index} is out of range, pool holds {count}")]
    FeatureOutOfRange {
        pool: &'static str,
        index: u32,
        count: u32,
    },

    #[error("Failed to deserialize table document")]
    Json(#[source] serde_json::Error),
    #[error("Failed to serialize table document")]
    JsonWrite(#[source] serde_json::Error),
    #[error("Data file lacks the `{0}` declaration")]
    DataJsMissing(&'static str),
    #[error("Failed to deserialize `{0}` declaration of data file")]
    DataJs(&'static str, #[source] serde_json::Error),
    #[error("Unable to infer table format of {0}")]
    UnknownFormat(Box<str>),

    #[error("ROM image lacks the iNES header")]
    RomHeader(#[source] binrw::Error),
    #[error("Failed to seek within ROM image")]
    RomSeek(#[source] io::Error),
    #[error("Failed to read arrangement template {0}")]
    RomTemplate(u32, #[source] binrw::Error),
    #[error("Arrangement template {template} has invalid byte {byte:#04x} at cell ({row},{col})")]
    RomTemplateByte {
        template: u32,
        row: usize,
        col: usize,
        byte: u8,
    },
    #[error("Failed to read portrait component record {0}")]
    RomComponent(u32, #[source] binrw::Error),
    #[error("Portrait {0} is not in the component table")]
    PortraitNotFound(u32),

    #[error(transparent)]
    IO(io::Error),
}
