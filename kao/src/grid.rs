use crate::error::KaoError;
use serde::{Deserialize, Serialize};

/// Width and height of a head arrangement, in tiles.
pub const GRID_SIZE: usize = 6;

/// One cell of a head arrangement.
///
/// `Gap` marks a position the head art leaves empty so that an eyes, nose or
/// mouth variant can be placed there. On the wire a gap is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Cell {
    Tile(u32),
    Gap,
}

impl Cell {
    pub fn slot(self) -> Option<u32> {
        match self {
            Self::Tile(slot) => Some(slot),
            Self::Gap => None,
        }
    }

    pub fn is_gap(self) -> bool {
        self == Self::Gap
    }

    /// The unchecked wire form used by `HeadRecord`.
    pub fn raw(self) -> Option<i64> {
        self.slot().map(i64::from)
    }
}

impl From<Option<u32>> for Cell {
    fn from(v: Option<u32>) -> Self {
        v.map_or(Self::Gap, Self::Tile)
    }
}

impl From<Cell> for Option<u32> {
    fn from(cell: Cell) -> Self {
        cell.slot()
    }
}

/// A checked 6x6 arrangement of tile slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TileGrid([[Cell; GRID_SIZE]; GRID_SIZE]);

impl TileGrid {
    pub fn new(cells: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(cells)
    }

    /// Builds a grid from loosely shaped rows, rejecting anything that is not
    /// exactly 6 rows of 6 cells. `idx` names the owning head in errors.
    pub fn from_rows(idx: u32, rows: &[Vec<Cell>]) -> Result<Self, KaoError> {
        if rows.len() != GRID_SIZE {
            return Err(KaoError::GridRows {
                idx,
                rows: rows.len(),
            });
        }

        let mut cells = [[Cell::Gap; GRID_SIZE]; GRID_SIZE];
        for (row, (dst, src)) in cells.iter_mut().zip(rows).enumerate() {
            *dst = src.as_slice().try_into().map_err(|_| KaoError::GridRowLen {
                idx,
                row,
                len: src.len(),
            })?;
        }
        Ok(Self(cells))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.0.get(row)?.get(col).copied()
    }

    pub fn is_gap(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(Cell::Gap)
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    /// Every cell in row-major order together with its `(row, col)`.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), Cell)> + '_ {
        self.0.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| ((row, col), *cell))
        })
    }

    pub fn gaps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|(_, cell)| cell.is_gap())
            .map(|(pos, _)| pos)
    }

    pub fn max_slot(&self) -> Option<u32> {
        self.cells().filter_map(|(_, cell)| cell.slot()).max()
    }

    pub fn to_raw_rows(&self) -> Vec<Vec<Option<i64>>> {
        raw_rows(&self.0)
    }
}

/// Converts checked cells back into unchecked record rows.
pub fn raw_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Vec<Vec<Option<i64>>> {
    rows.iter()
        .map(|row| row.as_ref().iter().map(|cell| cell.raw()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{Gap, Tile};

    fn sample_rows() -> Vec<Vec<Cell>> {
        vec![
            vec![Tile(0), Tile(1), Tile(4), Tile(5), Tile(8), Tile(9)],
            vec![Tile(2), Tile(3), Tile(6), Tile(7), Tile(10), Tile(11)],
            vec![Tile(12), Gap, Gap, Gap, Tile(14), Tile(15)],
            vec![Tile(13), Gap, Gap, Gap, Tile(16), Tile(17)],
            vec![Tile(18), Gap, Gap, Gap, Tile(20), Tile(21)],
            vec![Tile(19), Gap, Gap, Gap, Tile(22), Tile(23)],
        ]
    }

    #[test]
    fn grid_from_rows() {
        let grid = TileGrid::from_rows(0, &sample_rows()).unwrap();
        assert_eq!(grid.get(0, 2), Some(Tile(4)));
        assert_eq!(grid.get(6, 0), None);
        assert!(grid.is_gap(2, 1));
        assert!(!grid.is_gap(2, 0));
        assert_eq!(grid.max_slot(), Some(23));
        assert_eq!(grid.gaps().count(), 12);
        assert_eq!(grid.to_raw_rows()[2], [Some(12), None, None, None, Some(14), Some(15)]);
        assert_eq!(grid.to_raw_rows(), raw_rows(&sample_rows()));
    }

    #[test]
    fn grid_rejects_bad_shape() {
        let mut rows = sample_rows();
        rows.pop();
        assert!(matches!(
            TileGrid::from_rows(3, &rows),
            Err(KaoError::GridRows { idx: 3, rows: 5 })
        ));

        let mut rows = sample_rows();
        rows[4].push(Gap);
        assert!(matches!(
            TileGrid::from_rows(3, &rows),
            Err(KaoError::GridRowLen {
                idx: 3,
                row: 4,
                len: 7
            })
        ));
    }

    #[test]
    fn cell_serde_uses_null_for_gaps() {
        let row: Vec<Cell> = serde_json::from_str("[12, null, 0]").unwrap();
        assert_eq!(row, vec![Tile(12), Gap, Tile(0)]);
        assert_eq!(serde_json::to_string(&row).unwrap(), "[12,null,0]");
    }
}
