//! Head table generated from Sangokushi (Japan), kept as plain data.

use crate::{
    addr::BaseAddr,
    grid::{
        self,
        Cell::{self, Gap as X, Tile as T},
        GRID_SIZE,
    },
    table::{HeadRecord, VariantCounts},
};

struct BuiltinHead {
    idx: u32,
    template: u32,
    base_addr: u32,
    tile_count: u32,
    grid: [[Cell; GRID_SIZE]; GRID_SIZE],
}

pub(crate) const COUNTS: VariantCounts = VariantCounts {
    eyes: 20,
    noses: 20,
    mouths: 20,
};

pub(crate) fn head_records() -> impl Iterator<Item = HeadRecord> {
    HEADS.iter().map(|head| HeadRecord {
        idx: head.idx,
        template: head.template,
        base_addr: BaseAddr(head.base_addr),
        tile_count: head.tile_count,
        grid: grid::raw_rows(&head.grid),
    })
}

#[rustfmt::skip]
static HEADS: [BuiltinHead; 20] = [
    BuiltinHead {
        idx: 0,
        template: 0,
        base_addr: 0x1c014,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 1,
        template: 1,
        base_addr: 0x1c194,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 2,
        template: 2,
        base_addr: 0x1c314,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 3,
        template: 3,
        base_addr: 0x1c494,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 4,
        template: 4,
        base_addr: 0x1c614,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 5,
        template: 5,
        base_addr: 0x1c794,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(22), T(10)],
            [T(11), X, X, X, T(13), T(14)],
            [T(12), X, X, X, T(15), T(16)],
            [T(12), X, X, X, T(18), T(19)],
            [T(17), X, X, X, T(20), T(21)],
        ],
    },
    BuiltinHead {
        idx: 6,
        template: 6,
        base_addr: 0x1c914,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(13)],
            [T(13), X, X, X, T(18), T(13)],
            [T(17), X, X, X, T(19), T(20)],
        ],
    },
    BuiltinHead {
        idx: 7,
        template: 7,
        base_addr: 0x1ca94,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(20), T(10)],
            [T(11), X, X, X, T(13), T(14)],
            [T(12), X, X, X, T(15), T(12)],
            [T(12), X, X, X, T(17), T(12)],
            [T(16), X, X, X, T(18), T(19)],
        ],
    },
    BuiltinHead {
        idx: 8,
        template: 8,
        base_addr: 0x1cc14,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(3), T(4), T(7), T(8)],
            [T(0), T(2), T(5), T(6), T(9), T(10)],
            [T(0), X, X, X, T(11), T(12)],
            [T(0), X, X, X, T(13), T(14)],
            [T(0), X, X, X, T(16), T(17)],
            [T(15), X, X, X, T(18), T(19)],
        ],
    },
    BuiltinHead {
        idx: 9,
        template: 9,
        base_addr: 0x1cd94,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(13)],
            [T(13), X, X, X, T(18), T(13)],
            [T(17), X, X, X, T(19), T(20)],
        ],
    },
    BuiltinHead {
        idx: 10,
        template: 10,
        base_addr: 0x1cf14,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 11,
        template: 11,
        base_addr: 0x1d094,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(13)],
            [T(13), X, X, X, T(18), T(13)],
            [T(17), X, X, X, T(19), T(20)],
        ],
    },
    BuiltinHead {
        idx: 12,
        template: 12,
        base_addr: 0x1d214,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(0), X, X, X, T(12), T(13)],
            [T(0), X, X, X, T(14), T(15)],
            [T(0), X, X, X, T(17), T(18)],
            [T(16), X, X, X, T(19), T(20)],
        ],
    },
    BuiltinHead {
        idx: 13,
        template: 13,
        base_addr: 0x1d394,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(13), X, X, X, T(19), T(13)],
            [T(18), X, X, X, T(20), T(21)],
        ],
    },
    BuiltinHead {
        idx: 14,
        template: 14,
        base_addr: 0x1d514,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(13), T(14)],
            [T(12), X, X, X, T(15), T(16)],
            [T(12), X, X, X, T(18), T(19)],
            [T(17), X, X, X, T(20), T(21)],
        ],
    },
    BuiltinHead {
        idx: 15,
        template: 15,
        base_addr: 0x1d694,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 16,
        template: 16,
        base_addr: 0x1d814,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 17,
        template: 17,
        base_addr: 0x1d994,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 18,
        template: 18,
        base_addr: 0x1db14,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
    BuiltinHead {
        idx: 19,
        template: 19,
        base_addr: 0x1dc94,
        tile_count: 24,
        grid: [
            [T(0), T(1), T(4), T(5), T(8), T(9)],
            [T(2), T(3), T(6), T(7), T(10), T(11)],
            [T(12), X, X, X, T(14), T(15)],
            [T(13), X, X, X, T(16), T(17)],
            [T(18), X, X, X, T(20), T(21)],
            [T(19), X, X, X, T(22), T(23)],
        ],
    },
];
