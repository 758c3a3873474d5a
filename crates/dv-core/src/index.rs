//! Point id to flat-index lookup

use crate::error::InvalidTrace;

/// Maps renderer point ids to positions in the flattened grid
///
/// Point ids are dense integers in `[0, len)`. Unless the renderer supplies
/// its own table they are the row-major flat index itself.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexTable {
    /// Identity mapping over `len` cells
    RowMajor { len: usize },
    /// Table supplied by the renderer, entry `i` is the flat index of point `i`
    Explicit(Vec<usize>),
}

impl Default for IndexTable {
    fn default() -> Self {
        IndexTable::RowMajor { len: 0 }
    }
}

impl IndexTable {
    /// Synthesize the row-major table for `len` cells
    pub fn row_major(len: usize) -> Self {
        IndexTable::RowMajor { len }
    }

    /// Accept a renderer-supplied table after checking every entry addresses a cell
    pub fn from_renderer(ids: Vec<usize>, len: usize) -> Result<Self, InvalidTrace> {
        if let Some(&index) = ids.iter().find(|&&index| index >= len) {
            return Err(InvalidTrace::IndexOutOfRange { index, len });
        }
        Ok(IndexTable::Explicit(ids))
    }

    /// Flat index for a point id
    pub fn resolve(&self, point_id: usize) -> Option<usize> {
        match self {
            IndexTable::RowMajor { len } => (point_id < *len).then_some(point_id),
            IndexTable::Explicit(ids) => ids.get(point_id).copied(),
        }
    }

    /// Number of point ids the table answers for
    pub fn len(&self) -> usize {
        match self {
            IndexTable::RowMajor { len } => *len,
            IndexTable::Explicit(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_resolution() {
        let table = IndexTable::row_major(6);
        assert_eq!(table.resolve(0), Some(0));
        assert_eq!(table.resolve(5), Some(5));
        assert_eq!(table.resolve(6), None);
    }

    #[test]
    fn test_explicit_table() {
        let table = IndexTable::from_renderer(vec![2, 0, 1], 3).unwrap();
        assert_eq!(table.resolve(0), Some(2));
        assert_eq!(table.resolve(3), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_explicit_table_out_of_range() {
        let err = IndexTable::from_renderer(vec![0, 9], 4).unwrap_err();
        assert_eq!(err, InvalidTrace::IndexOutOfRange { index: 9, len: 4 });
    }

    #[test]
    fn test_default_is_empty() {
        assert!(IndexTable::default().is_empty());
        assert_eq!(IndexTable::default().resolve(0), None);
    }
}
