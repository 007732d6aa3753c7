use crate::{
    addr::BaseAddr,
    builtin,
    error::KaoError,
    grid::{Cell, TileGrid},
};
use nohash_hasher::IntSet;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A head entry as it appears in a generated data file, before any checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadRecord {
    pub idx: u32,
    pub template: u32,
    pub base_addr: BaseAddr,
    pub tile_count: u32,
    /// Slots as written, `null` for a gap. Range checks happen on load.
    pub grid: Vec<Vec<Option<i64>>>,
}

/// A validated head: its grid is 6x6 and only references its own tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadVariant {
    pub idx: u32,
    pub template: u32,
    pub base_addr: BaseAddr,
    pub tile_count: u32,
    pub grid: TileGrid,
}

impl HeadVariant {
    fn from_record(record: HeadRecord) -> Result<Self, KaoError> {
        let HeadRecord {
            idx,
            template,
            base_addr,
            tile_count,
            grid,
        } = record;

        if !base_addr.holds_tiles(tile_count) {
            return Err(KaoError::TileBlockOverflow {
                idx,
                base_addr,
                tile_count,
            });
        }

        let check = |row: usize, col: usize, raw: Option<i64>| -> Result<Cell, KaoError> {
            let Some(slot) = raw else {
                return Ok(Cell::Gap);
            };
            match u32::try_from(slot) {
                Ok(tile) if tile < tile_count => Ok(Cell::Tile(tile)),
                _ => Err(KaoError::TileOutOfRange {
                    idx,
                    row,
                    col,
                    slot,
                    tile_count,
                }),
            }
        };
        let rows = grid
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, raw)| check(row, col, *raw))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            idx,
            template,
            base_addr,
            tile_count,
            grid: TileGrid::from_rows(idx, &rows)?,
        })
    }

    /// ROM offset of the tile a grid slot refers to.
    pub fn tile_addr(&self, slot: u32) -> BaseAddr {
        self.base_addr.tile(slot)
    }
}

impl From<&HeadVariant> for HeadRecord {
    fn from(head: &HeadVariant) -> Self {
        Self {
            idx: head.idx,
            template: head.template,
            base_addr: head.base_addr,
            tile_count: head.tile_count,
            grid: head.grid.to_raw_rows(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Eyes,
    Nose,
    Mouth,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Self::Eyes, Self::Nose, Self::Mouth];

    pub fn name(self) -> &'static str {
        match self {
            Self::Eyes => "eyes",
            Self::Nose => "noses",
            Self::Mouth => "mouths",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sizes of the eyes, nose and mouth pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCounts {
    pub eyes: u32,
    #[serde(alias = "faces")]
    pub noses: u32,
    pub mouths: u32,
}

impl VariantCounts {
    pub fn get(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Eyes => self.eyes,
            Feature::Nose => self.noses,
            Feature::Mouth => self.mouths,
        }
    }
}

/// The immutable head variant table. Build it once and hand it to whoever
/// needs it; every constructor validates the whole input or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    heads: Vec<HeadVariant>,
    counts: VariantCounts,
}

impl VariantTable {
    pub fn new(
        records: impl IntoIterator<Item = HeadRecord>,
        counts: VariantCounts,
    ) -> Result<Self, KaoError> {
        let heads = records
            .into_iter()
            .map(HeadVariant::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = IntSet::with_capacity_and_hasher(heads.len(), Default::default());
        for head in &heads {
            if head.idx as usize >= heads.len() {
                return Err(KaoError::SparseIdx {
                    idx: head.idx,
                    len: heads.len(),
                });
            }
            if !seen.insert(head.idx) {
                return Err(KaoError::DuplicateIdx(head.idx));
            }
        }

        let mut heads = heads;
        heads.sort_unstable_by_key(|head| head.idx);
        debug!(heads = heads.len(), ?counts, "variant table validated");

        Ok(Self { heads, counts })
    }

    /// The table generated from the Japanese release, shipped with the crate.
    pub fn builtin() -> Result<&'static VariantTable, KaoError> {
        static BUILTIN: OnceCell<VariantTable> = OnceCell::new();
        BUILTIN.get_or_try_init(|| Self::new(builtin::head_records(), builtin::COUNTS))
    }

    /// All heads in ascending `idx` order.
    pub fn head_variants(&self) -> &[HeadVariant] {
        &self.heads
    }

    pub fn variant_counts(&self) -> VariantCounts {
        self.counts
    }

    pub fn head(&self, idx: u32) -> Result<&HeadVariant, KaoError> {
        self.heads
            .get(idx as usize)
            .ok_or(KaoError::HeadNotFound(idx))
    }

    pub fn records(&self) -> Vec<HeadRecord> {
        self.heads.iter().map(HeadRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTS: VariantCounts = VariantCounts {
        eyes: 2,
        noses: 2,
        mouths: 2,
    };

    fn record(idx: u32) -> HeadRecord {
        let grid: Vec<Vec<Option<i64>>> = (0..6i64)
            .map(|r| {
                (0..6i64)
                    .map(|c| {
                        if (2..6).contains(&r) && (1..4).contains(&c) {
                            None
                        } else {
                            Some(r * 4 % 24)
                        }
                    })
                    .collect()
            })
            .collect();
        HeadRecord {
            idx,
            template: idx,
            base_addr: BaseAddr(0x1000 + idx * 0x180),
            tile_count: 24,
            grid,
        }
    }

    #[test]
    fn table_sorts_by_idx() {
        let table = VariantTable::new([record(2), record(0), record(1)], COUNTS).unwrap();
        let idxs: Vec<u32> = table.head_variants().iter().map(|h| h.idx).collect();
        assert_eq!(idxs, vec![0, 1, 2]);
        assert_eq!(table.head(1).unwrap().base_addr, BaseAddr(0x1180));
        assert!(matches!(table.head(3), Err(KaoError::HeadNotFound(3))));
        assert_eq!(table.variant_counts(), COUNTS);
    }

    #[test]
    fn table_rejects_duplicate_idx() {
        let err = VariantTable::new([record(0), record(1), record(1)], COUNTS).unwrap_err();
        assert!(matches!(err, KaoError::DuplicateIdx(1)));
    }

    #[test]
    fn table_rejects_sparse_idx() {
        let err = VariantTable::new([record(0), record(2)], COUNTS).unwrap_err();
        assert!(matches!(err, KaoError::SparseIdx { idx: 2, len: 2 }));
    }

    #[test]
    fn table_rejects_out_of_range_tile() {
        let mut bad = record(0);
        bad.grid[5][5] = Some(24);
        let err = VariantTable::new([bad], COUNTS).unwrap_err();
        assert!(matches!(
            err,
            KaoError::TileOutOfRange {
                idx: 0,
                row: 5,
                col: 5,
                slot: 24,
                tile_count: 24
            }
        ));
    }

    #[test]
    fn table_rejects_negative_tile() {
        let mut bad = record(0);
        bad.grid[0][1] = Some(-1);
        let err = VariantTable::new([bad], COUNTS).unwrap_err();
        assert!(matches!(
            err,
            KaoError::TileOutOfRange {
                idx: 0,
                row: 0,
                col: 1,
                slot: -1,
                tile_count: 24
            }
        ));
    }

    #[test]
    fn table_rejects_wide_tile_in_small_block() {
        let mut bad = record(0);
        bad.grid[1][4] = Some(300);
        let err = VariantTable::new([bad], COUNTS).unwrap_err();
        assert!(matches!(
            err,
            KaoError::TileOutOfRange {
                row: 1,
                col: 4,
                slot: 300,
                tile_count: 24,
                ..
            }
        ));
    }

    #[test]
    fn table_accepts_wide_tile_in_large_block() {
        let mut big = record(0);
        big.tile_count = 400;
        big.grid[1][4] = Some(300);
        let table = VariantTable::new([big], COUNTS).unwrap();
        let head = table.head(0).unwrap();
        assert_eq!(head.grid.get(1, 4), Some(Cell::Tile(300)));
        assert_eq!(head.tile_addr(300), BaseAddr(0x1000 + 300 * 16));
        assert_eq!(table.records()[0].grid[1][4], Some(300));
    }

    #[test]
    fn table_rejects_block_past_address_space() {
        let mut bad = record(0);
        bad.base_addr = BaseAddr(0xffffffff);
        let err = VariantTable::new([bad], COUNTS).unwrap_err();
        assert!(matches!(
            err,
            KaoError::TileBlockOverflow {
                idx: 0,
                base_addr: BaseAddr(0xffffffff),
                tile_count: 24
            }
        ));
    }

    #[test]
    fn block_ending_at_the_top_resolves() {
        let mut top = record(0);
        top.base_addr = BaseAddr(0xfffffe80);
        top.grid[5][5] = Some(23);
        let table = VariantTable::new([top], COUNTS).unwrap();
        assert_eq!(table.head(0).unwrap().tile_addr(23), BaseAddr(0xfffffff0));
    }

    #[test]
    fn table_rejects_missing_row() {
        let mut bad = record(1);
        bad.grid.remove(3);
        let err = VariantTable::new([record(0), bad], COUNTS).unwrap_err();
        assert!(matches!(err, KaoError::GridRows { idx: 1, rows: 5 }));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = VariantTable::new(Vec::new(), COUNTS).unwrap();
        assert!(table.head_variants().is_empty());
    }

    #[test]
    fn records_round_trip() {
        let table = VariantTable::new([record(0), record(1)], COUNTS).unwrap();
        let again = VariantTable::new(table.records(), COUNTS).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn head_tile_addr() {
        let table = VariantTable::new([record(0)], COUNTS).unwrap();
        assert_eq!(table.head(0).unwrap().tile_addr(2), BaseAddr(0x1020));
    }

    #[test]
    fn counts_accept_faces_alias() {
        let counts: VariantCounts =
            serde_json::from_str(r#"{ "eyes": 20, "faces": 20, "mouths": 20 }"#).unwrap();
        assert_eq!(counts.get(Feature::Nose), 20);
    }
}
