//! Square binary cell grids and their quarter-turn rotations.

use serde::{Deserialize, Serialize};

/// Errors raised while building a [`BinaryGrid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("cell ({row}, {col}) has value {value}, expected 0 or 1")]
    NonBinary { row: usize, col: usize, value: u8 },
    #[error("bit string has {got} characters, expected {expected}")]
    BitStringLength { expected: usize, got: usize },
    #[error("grid of size {size} needs {expected} cells, got {got}")]
    CellCount {
        size: usize,
        expected: usize,
        got: usize,
    },
}

/// Clockwise quarter-turn rotation of a square grid.
///
/// These are the four rotations of the dihedral group acting on a square
/// glyph; reflections never occur for a printed marker seen from the front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Build from a number of clockwise quarter turns (taken modulo 4).
    pub fn from_quarter_turns(turns: u8) -> Self {
        Self::ALL[(turns & 3) as usize]
    }

    #[inline]
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    #[inline]
    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Rotation that undoes `self`.
    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Composition: first `self`, then `other`.
    pub fn then(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }
}

/// A `size × size` grid of binary cells, stored row-major.
///
/// `1` marks a set cell; the meaning of set (black or white) is up to the
/// detector that produced the grid, it only has to be consistent with the
/// registered patterns.
///
/// Deserialization runs the same checks as the constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridCells", into = "GridCells")]
pub struct BinaryGrid {
    size: usize,
    cells: Vec<u8>,
}

/// Unchecked serialized form of [`BinaryGrid`].
#[derive(Serialize, Deserialize)]
struct GridCells {
    size: usize,
    cells: Vec<u8>,
}

impl TryFrom<GridCells> for BinaryGrid {
    type Error = GridError;

    fn try_from(raw: GridCells) -> Result<Self, Self::Error> {
        let GridCells { size, cells } = raw;
        if size == 0 {
            return Err(GridError::Empty);
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                size,
                expected,
                got: cells.len(),
            });
        }
        if let Some(i) = cells.iter().position(|&v| v > 1) {
            return Err(GridError::NonBinary {
                row: i / size,
                col: i % size,
                value: cells[i],
            });
        }
        Ok(Self { size, cells })
    }
}

impl From<BinaryGrid> for GridCells {
    fn from(grid: BinaryGrid) -> Self {
        Self {
            size: grid.size,
            cells: grid.cells,
        }
    }
}

impl BinaryGrid {
    /// Build from explicit rows. Every row must have exactly `rows.len()`
    /// cells and every cell must be `0` or `1`.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if value > 1 {
                    return Err(GridError::NonBinary { row, col, value });
                }
                cells.push(value);
            }
        }

        Ok(Self { size, cells })
    }

    /// Parse a row-major string of `'0'`/`'1'` characters.
    ///
    /// Any character other than `'0'` counts as a set cell.
    pub fn from_bit_string(size: usize, bits: &str) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::Empty);
        }
        let expected = size * size;
        let got = bits.chars().count();
        if got != expected {
            return Err(GridError::BitStringLength { expected, got });
        }

        let cells = bits.chars().map(|c| u8::from(c != '0')).collect();
        Ok(Self { size, cells })
    }

    /// Row-major `'0'`/`'1'` representation, inverse of [`BinaryGrid::from_bit_string`].
    pub fn to_bit_string(&self) -> String {
        self.cells
            .iter()
            .map(|&c| if c == 0 { '0' } else { '1' })
            .collect()
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }

    /// Return a copy rotated clockwise by `rotation`.
    ///
    /// For one quarter turn: `out[r][c] = self[n - 1 - c][r]`.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let n = self.size;
        if rotation == Rotation::Deg0 {
            return self.clone();
        }

        let mut cells = vec![0u8; n * n];
        for r in 0..n {
            for c in 0..n {
                let (sr, sc) = match rotation {
                    Rotation::Deg0 => (r, c),
                    Rotation::Deg90 => (n - 1 - c, r),
                    Rotation::Deg180 => (n - 1 - r, n - 1 - c),
                    Rotation::Deg270 => (c, n - 1 - r),
                };
                cells[r * n + c] = self.cells[sr * n + sc];
            }
        }
        Self { size: n, cells }
    }
}
