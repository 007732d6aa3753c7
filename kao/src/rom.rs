//! Reading the head table straight out of a Sangokushi (Japan) iNES image.
//!
//! All offsets below are file offsets, i.e. they include the 16-byte iNES
//! header.

use crate::{
    addr::BaseAddr,
    error::KaoError,
    grid::{self, Cell, GRID_SIZE},
    table::{Feature, HeadRecord, VariantCounts, VariantTable},
};
use binrw::{binread, BinRead};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

pub const HEAD_COUNT: u32 = 20;
pub const HEAD_TILE_COUNT: u32 = 24;
pub const HEAD_BASE: BaseAddr = BaseAddr(0x1c014);

pub const TEMPLATE_START: u64 = 0x1ed14;
pub const TEMPLATE_LEN: usize = GRID_SIZE * GRID_SIZE;
/// Template bytes at or above this value are `slot + TEMPLATE_SLOT_BIAS`.
pub const TEMPLATE_SLOT_BIAS: u8 = 0x64;

pub const FEATURE_VARIANTS: u32 = 20;

#[binread]
#[br(magic = b"NES\x1a")]
struct INesHeader {
    _prg_banks: u8,
    _chr_banks: u8,
    _flags: [u8; 10],
}

/// Where one pool of interchangeable face parts lives in the ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePool {
    pub start: BaseAddr,
    pub tiles_per_variant: u32,
}

impl FeaturePool {
    pub fn of(feature: Feature) -> Self {
        match feature {
            Feature::Eyes => Self {
                start: BaseAddr(0x1de14),
                tiles_per_variant: 3,
            },
            Feature::Nose => Self {
                start: BaseAddr(0x1e1d4),
                tiles_per_variant: 3,
            },
            Feature::Mouth => Self {
                start: BaseAddr(0x1e594),
                tiles_per_variant: 6,
            },
        }
    }

    pub fn tile_addr(self, variant: u32, tile: u32) -> BaseAddr {
        self.start.tile(variant * self.tiles_per_variant + tile)
    }
}

pub fn head_base(idx: u32) -> BaseAddr {
    HEAD_BASE.tile(idx * HEAD_TILE_COUNT)
}

pub(crate) fn check_header(rom: &mut (impl Read + Seek)) -> Result<(), KaoError> {
    rom.seek(SeekFrom::Start(0)).map_err(KaoError::RomSeek)?;
    INesHeader::read_le(rom).map_err(KaoError::RomHeader)?;
    Ok(())
}

fn decode_template(template: u32, bytes: &[u8; TEMPLATE_LEN]) -> Result<Vec<Vec<Cell>>, KaoError> {
    bytes
        .chunks(GRID_SIZE)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, &byte)| match byte {
                    0 => Ok(Cell::Gap),
                    b if b >= TEMPLATE_SLOT_BIAS => {
                        Ok(Cell::Tile(u32::from(b - TEMPLATE_SLOT_BIAS)))
                    }
                    _ => Err(KaoError::RomTemplateByte {
                        template,
                        row,
                        col,
                        byte,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

pub fn read_template(rom: &mut (impl Read + Seek), template: u32) -> Result<Vec<Vec<Cell>>, KaoError> {
    let offset = TEMPLATE_START + template as u64 * TEMPLATE_LEN as u64;
    rom.seek(SeekFrom::Start(offset)).map_err(KaoError::RomSeek)?;
    let bytes = <[u8; TEMPLATE_LEN]>::read_le(rom).map_err(|e| KaoError::RomTemplate(template, e))?;
    decode_template(template, &bytes)
}

/// Builds the variant table from a ROM image. Heads and templates pair up
/// one to one.
pub fn extract_table(mut rom: impl Read + Seek) -> Result<VariantTable, KaoError> {
    check_header(&mut rom)?;

    let mut records = Vec::with_capacity(HEAD_COUNT as usize);
    for idx in 0..HEAD_COUNT {
        let grid = read_template(&mut rom, idx)?;
        records.push(HeadRecord {
            idx,
            template: idx,
            base_addr: head_base(idx),
            tile_count: HEAD_TILE_COUNT,
            grid: grid::raw_rows(&grid),
        });
    }
    debug!(heads = records.len(), "extracted head templates from ROM");

    VariantTable::new(
        records,
        VariantCounts {
            eyes: FEATURE_VARIANTS,
            noses: FEATURE_VARIANTS,
            mouths: FEATURE_VARIANTS,
        },
    )
}

/// Number of bytes a test ROM needs to cover every table this module reads.
#[cfg(test)]
pub(crate) const TEST_ROM_LEN: usize = 0x1f034 + 174 * 5;

#[cfg(test)]
pub(crate) fn test_rom() -> Vec<u8> {
    let mut rom = vec![0u8; TEST_ROM_LEN];
    rom[..4].copy_from_slice(b"NES\x1a");
    for t in 0..HEAD_COUNT as usize {
        let at = TEMPLATE_START as usize + t * TEMPLATE_LEN;
        let template = &mut rom[at..at + TEMPLATE_LEN];
        for (i, byte) in template.iter_mut().enumerate() {
            let (row, col) = (i / GRID_SIZE, i % GRID_SIZE);
            if row < 2 || !(1..4).contains(&col) {
                *byte = TEMPLATE_SLOT_BIAS + (i % HEAD_TILE_COUNT as usize) as u8;
            }
        }
    }
    rom
}
