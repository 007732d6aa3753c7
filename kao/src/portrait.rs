//! Generic ("mob") portraits: which head and face parts each one combines,
//! and where every tile of the assembled 6x6 portrait comes from.

use crate::{
    addr::BaseAddr,
    error::KaoError,
    grid::{Cell, GRID_SIZE},
    rom::{self, FeaturePool},
    table::{Feature, VariantTable},
};
use binrw::{binread, BinRead};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io::{Read, Seek, SeekFrom},
};
use tracing::debug;

pub const COMPONENT_TABLE_START: u64 = 0x1f034;
pub const FIRST_PORTRAIT: u32 = 81;
pub const LAST_PORTRAIT: u32 = 254;
pub const PORTRAIT_COUNT: u32 = LAST_PORTRAIT - FIRST_PORTRAIT + 1;
pub const COMPONENT_RECORD_LEN: u32 = 5;
/// Names of the component record fields, in ROM order.
pub const COMPONENT_FIELDS: [&str; 5] = ["cat", "head", "eye", "nose", "mouth"];
/// Every pool is split into categories of this many consecutive variants.
pub const CATEGORY_SIZE: u32 = 5;

#[binread]
#[br(little)]
struct ComponentRecord {
    category: u8,
    head: u8,
    eyes: u8,
    nose: u8,
    mouth: u8,
}

/// One row of the ROM component table. Part indices are local to the
/// portrait's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortraitParts {
    pub portrait: u32,
    pub category: u8,
    pub head: u8,
    pub eyes: u8,
    pub nose: u8,
    pub mouth: u8,
}

impl PortraitParts {
    fn global(&self, local: u8) -> u32 {
        u32::from(self.category) * CATEGORY_SIZE + u32::from(local)
    }

    /// ROM offset of this portrait's component record, if it has one.
    pub fn record_addr(&self) -> Option<BaseAddr> {
        if !(FIRST_PORTRAIT..=LAST_PORTRAIT).contains(&self.portrait) {
            return None;
        }
        let start = BaseAddr(COMPONENT_TABLE_START as u32);
        Some(BaseAddr(
            start.offset() + (self.portrait - FIRST_PORTRAIT) * COMPONENT_RECORD_LEN,
        ))
    }

    /// The record bytes in the order of `COMPONENT_FIELDS`.
    pub fn fields(&self) -> [u8; 5] {
        [self.category, self.head, self.eyes, self.nose, self.mouth]
    }

    pub fn head_idx(&self) -> u32 {
        self.global(self.head)
    }

    pub fn feature_idx(&self, feature: Feature) -> u32 {
        self.global(match feature {
            Feature::Eyes => self.eyes,
            Feature::Nose => self.nose,
            Feature::Mouth => self.mouth,
        })
    }

    /// Checks every part against `table` and lays out the portrait.
    pub fn resolve(&self, table: &VariantTable) -> Result<Composition, KaoError> {
        let head = table.head(self.head_idx())?;
        let counts = table.variant_counts();
        for feature in Feature::ALL {
            let index = self.feature_idx(feature);
            if index >= counts.get(feature) {
                return Err(KaoError::FeatureOutOfRange {
                    pool: feature.name(),
                    index,
                    count: counts.get(feature),
                });
            }
        }

        let mut cells = [[Placement::Empty; GRID_SIZE]; GRID_SIZE];
        for ((row, col), cell) in head.grid.cells() {
            cells[row][col] = match cell {
                Cell::Tile(slot) => Placement::Head {
                    slot,
                    addr: head.tile_addr(slot),
                },
                Cell::Gap => match feature_tile(row, col) {
                    Some((feature, tile)) => {
                        let variant = self.feature_idx(feature);
                        Placement::Feature {
                            feature,
                            variant,
                            tile,
                            addr: FeaturePool::of(feature).tile_addr(variant, u32::from(tile)),
                        }
                    }
                    None => Placement::Empty,
                },
            };
        }

        Ok(Composition {
            parts: *self,
            head: head.idx,
            cells,
        })
    }
}

/// Which part tile fills a gap at `(row, col)`. Eyes and nose are one strip
/// of three tiles each; the mouth is stored as columns, so its two rows take
/// tiles 0,1,4 and 2,3,5.
fn feature_tile(row: usize, col: usize) -> Option<(Feature, u8)> {
    const MOUTH_TOP: [u8; 3] = [0, 1, 4];
    const MOUTH_BOTTOM: [u8; 3] = [2, 3, 5];

    if !(1..=3).contains(&col) {
        return None;
    }
    let c = col - 1;
    match row {
        2 => Some((Feature::Eyes, c as u8)),
        3 => Some((Feature::Nose, c as u8)),
        4 => Some((Feature::Mouth, MOUTH_TOP[c])),
        5 => Some((Feature::Mouth, MOUTH_BOTTOM[c])),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    Empty,
    Head {
        slot: u32,
        addr: BaseAddr,
    },
    Feature {
        #[serde(serialize_with = "serialize_feature")]
        feature: Feature,
        variant: u32,
        tile: u8,
        addr: BaseAddr,
    },
}

fn serialize_feature<S: serde::Serializer>(feature: &Feature, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(feature.name())
}

/// A fully resolved portrait: the source of each of the 36 tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub parts: PortraitParts,
    pub head: u32,
    pub cells: [[Placement; GRID_SIZE]; GRID_SIZE],
}

impl Composition {
    pub fn placements(&self) -> impl Iterator<Item = ((usize, usize), Placement)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, placement)| ((row, col), *placement))
        })
    }
}

/// Reads the component table for portraits 81 through 254.
pub fn read_component_table(mut rom: impl Read + Seek) -> Result<Vec<PortraitParts>, KaoError> {
    rom::check_header(&mut rom)?;
    rom.seek(SeekFrom::Start(COMPONENT_TABLE_START))
        .map_err(KaoError::RomSeek)?;

    let mut parts = Vec::with_capacity(PORTRAIT_COUNT as usize);
    for i in 0..PORTRAIT_COUNT {
        let record = ComponentRecord::read(&mut rom).map_err(|e| KaoError::RomComponent(i, e))?;
        parts.push(PortraitParts {
            portrait: FIRST_PORTRAIT + i,
            category: record.category,
            head: record.head,
            eyes: record.eyes,
            nose: record.nose,
            mouth: record.mouth,
        });
    }
    debug!(portraits = parts.len(), "read portrait component table");
    Ok(parts)
}

pub fn find_portrait(parts: &[PortraitParts], portrait: u32) -> Result<&PortraitParts, KaoError> {
    parts
        .iter()
        .find(|p| p.portrait == portrait)
        .ok_or(KaoError::PortraitNotFound(portrait))
}

/// How the values of one component field are spread over a set of portraits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSpread {
    pub name: &'static str,
    /// Number of portraits per value.
    pub counts: BTreeMap<u8, u32>,
}

impl ComponentSpread {
    pub fn min(&self) -> Option<u8> {
        self.counts.keys().next().copied()
    }

    pub fn max(&self) -> Option<u8> {
        self.counts.keys().next_back().copied()
    }
}

/// One spread per entry of `COMPONENT_FIELDS`.
pub fn summarize(parts: &[PortraitParts]) -> Vec<ComponentSpread> {
    COMPONENT_FIELDS
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let mut counts = BTreeMap::new();
            for p in parts {
                *counts.entry(p.fields()[i]).or_insert(0) += 1;
            }
            ComponentSpread { name, counts }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::test_rom;
    use std::io::Cursor;

    fn parts(category: u8, head: u8, eyes: u8, nose: u8, mouth: u8) -> PortraitParts {
        PortraitParts {
            portrait: 100,
            category,
            head,
            eyes,
            nose,
            mouth,
        }
    }

    #[test]
    fn global_indices() {
        let p = parts(3, 1, 0, 4, 2);
        assert_eq!(p.head_idx(), 16);
        assert_eq!(p.feature_idx(Feature::Eyes), 15);
        assert_eq!(p.feature_idx(Feature::Nose), 19);
        assert_eq!(p.feature_idx(Feature::Mouth), 17);
    }

    #[test]
    fn resolve_builtin_head() {
        let table = VariantTable::builtin().unwrap();
        let comp = parts(1, 3, 2, 0, 1).resolve(table).unwrap();
        assert_eq!(comp.head, 8);

        assert_eq!(
            comp.cells[0][0],
            Placement::Head {
                slot: 0,
                addr: BaseAddr(0x1cc14)
            }
        );
        assert_eq!(
            comp.cells[2][2],
            Placement::Feature {
                feature: Feature::Eyes,
                variant: 7,
                tile: 1,
                addr: BaseAddr(0x1de14 + (7 * 3 + 1) * 16),
            }
        );
        assert_eq!(
            comp.cells[5][3],
            Placement::Feature {
                feature: Feature::Mouth,
                variant: 6,
                tile: 5,
                addr: BaseAddr(0x1e594 + (6 * 6 + 5) * 16),
            }
        );
        assert_eq!(
            comp.placements()
                .filter(|(_, p)| matches!(p, Placement::Feature { .. }))
                .count(),
            12
        );
        assert!(comp
            .placements()
            .all(|(_, p)| !matches!(p, Placement::Empty)));
    }

    #[test]
    fn resolve_rejects_out_of_range_parts() {
        let table = VariantTable::builtin().unwrap();
        assert!(matches!(
            parts(4, 5, 0, 0, 0).resolve(table),
            Err(KaoError::HeadNotFound(25))
        ));
        assert!(matches!(
            parts(3, 0, 0, 0, 5).resolve(table),
            Err(KaoError::FeatureOutOfRange {
                pool: "mouths",
                index: 20,
                count: 20
            })
        ));
    }

    #[test]
    fn gap_outside_face_region_stays_empty() {
        assert_eq!(feature_tile(2, 0), None);
        assert_eq!(feature_tile(1, 2), None);
        assert_eq!(feature_tile(4, 3), Some((Feature::Mouth, 4)));
        assert_eq!(feature_tile(3, 1), Some((Feature::Nose, 0)));
    }

    #[test]
    fn component_table_from_rom() {
        let mut rom = test_rom();
        let last = COMPONENT_TABLE_START as usize + (PORTRAIT_COUNT as usize - 1) * 5;
        rom[last..last + 5].copy_from_slice(&[2, 4, 1, 3, 0]);

        let table = read_component_table(Cursor::new(rom)).unwrap();
        assert_eq!(table.len(), PORTRAIT_COUNT as usize);
        assert_eq!(table[0].portrait, FIRST_PORTRAIT);

        let p = find_portrait(&table, LAST_PORTRAIT).unwrap();
        assert_eq!(p.head_idx(), 14);
        assert_eq!(p.feature_idx(Feature::Nose), 13);
        assert!(matches!(
            find_portrait(&table, 80),
            Err(KaoError::PortraitNotFound(80))
        ));
    }

    #[test]
    fn component_table_truncated() {
        let rom = test_rom()[..COMPONENT_TABLE_START as usize + 12].to_vec();
        assert!(matches!(
            read_component_table(Cursor::new(rom)),
            Err(KaoError::RomComponent(2, _))
        ));
    }

    #[test]
    fn record_addr_follows_portrait_number() {
        let mut p = parts(0, 0, 0, 0, 0);
        p.portrait = FIRST_PORTRAIT;
        assert_eq!(p.record_addr(), Some(BaseAddr(0x1f034)));
        p.portrait = LAST_PORTRAIT;
        assert_eq!(p.record_addr().unwrap().to_string(), "0x1f395");
        p.portrait = 80;
        assert_eq!(p.record_addr(), None);
    }

    #[test]
    fn summarize_counts_each_field() {
        let spreads = summarize(&[
            parts(0, 1, 2, 3, 4),
            parts(0, 4, 2, 0, 4),
            parts(3, 1, 2, 0, 0),
        ]);
        let names: Vec<&str> = spreads.iter().map(|s| s.name).collect();
        assert_eq!(names, COMPONENT_FIELDS);

        let cat = &spreads[0];
        assert_eq!((cat.min(), cat.max()), (Some(0), Some(3)));
        assert_eq!(cat.counts, BTreeMap::from([(0, 2), (3, 1)]));
        assert_eq!(spreads[2].counts, BTreeMap::from([(2, 3)]));
        assert_eq!(spreads[3].counts, BTreeMap::from([(0, 2), (3, 1)]));

        let empty = summarize(&[]);
        assert_eq!(empty.len(), 5);
        assert_eq!(empty[1].min(), None);
    }
}
