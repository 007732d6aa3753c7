use crate::error::KaoError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Serialize};
use std::{fmt, str::FromStr};

lazy_static! {
    static ref ADDR_REGEX: Regex = Regex::new(r"^0x(0|[1-9a-f][0-9a-f]*)$").unwrap();
}

/// Size of one NES 2bpp tile in bytes.
pub const TILE_SIZE: u32 = 16;

/// File offset into the ROM image, rendered the way the table generator
/// prints it: `0x` followed by lowercase hex digits, no padding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseAddr(pub u32);

impl BaseAddr {
    pub fn new(offset: u32) -> Self {
        Self(offset)
    }

    pub fn offset(self) -> u32 {
        self.0
    }

    /// Whether a block of `tiles` tiles starting here ends within the 32-bit
    /// address space.
    pub fn holds_tiles(self, tiles: u32) -> bool {
        u64::from(self.0) + u64::from(tiles) * u64::from(TILE_SIZE) <= 1 << 32
    }

    /// Offset of the `slot`-th tile of the block starting here. The block
    /// must have passed `holds_tiles` for a count above `slot`.
    pub fn tile(self, slot: u32) -> BaseAddr {
        Self(self.0 + slot * TILE_SIZE)
    }
}

impl FromStr for BaseAddr {
    type Err = KaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cap = ADDR_REGEX
            .captures(s)
            .ok_or_else(|| KaoError::AddrFormat(s.into()))?;
        u32::from_str_radix(&cap[1], 16)
            .map(Self)
            .map_err(|_| KaoError::AddrRange(s.into()))
    }
}

impl fmt::Display for BaseAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for BaseAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseAddr({:#x})", self.0)
    }
}

impl Serialize for BaseAddr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BaseAddr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
