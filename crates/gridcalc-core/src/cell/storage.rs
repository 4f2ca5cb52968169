//! Sparse cell storage
//!
//! Only touched cells are stored, using a row-based BTreeMap structure.
//! A grid with millions of addressable cells costs memory proportional
//! to the populated cells, not the addressable space.

use std::collections::BTreeMap;

use super::{CellContent, CellValue};

/// Complete data for a single cell: what the user entered plus the
/// computed result.
#[derive(Debug, Clone, Default)]
pub struct CellSlot {
    /// The raw entered content
    pub content: CellContent,
    /// The cached computed value
    pub value: CellValue,
}

impl CellSlot {
    /// Create a slot holding only content (value not yet computed)
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            value: CellValue::Empty,
        }
    }

    /// Check if this slot carries no information at all
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.value.is_empty()
    }
}

/// Sparse row-based storage for grid cells
///
/// Design decisions:
/// - BTreeMap keeps iteration in row/column order (deterministic renders)
/// - Row-major layout: `BTreeMap<row, BTreeMap<col, CellSlot>>`
/// - Slots that become fully empty are physically removed
#[derive(Debug, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u32, CellSlot>>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell slot
    pub fn get(&self, row: u32, col: u32) -> Option<&CellSlot> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell slot
    pub fn get_mut(&mut self, row: u32, col: u32) -> Option<&mut CellSlot> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Set a cell slot
    ///
    /// If the slot is empty (no content, no value), the cell is removed.
    pub fn set(&mut self, row: u32, col: u32, slot: CellSlot) {
        if slot.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, slot);
        }
    }

    /// Set just the cell content (preserving any cached value)
    pub fn set_content(&mut self, row: u32, col: u32, content: CellContent) {
        if let Some(slot) = self.get_mut(row, col) {
            slot.content = content;
            if slot.is_empty() {
                self.remove(row, col);
            }
        } else if !content.is_empty() {
            self.rows
                .entry(row)
                .or_default()
                .insert(col, CellSlot::new(content));
        }
    }

    /// Set just the cell value (preserving content)
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        if let Some(slot) = self.get_mut(row, col) {
            slot.value = value;
            if slot.is_empty() {
                self.remove(row, col);
            }
        } else if !value.is_empty() {
            self.rows.entry(row).or_default().insert(
                col,
                CellSlot {
                    content: CellContent::Empty,
                    value,
                },
            );
        }
    }

    /// Remove a cell, returning its prior slot
    pub fn remove(&mut self, row: u32, col: u32) -> Option<CellSlot> {
        let result = self.rows.get_mut(&row).and_then(|r| r.remove(&col));

        // Clean up empty rows
        if let Some(row_map) = self.rows.get(&row) {
            if row_map.is_empty() {
                self.rows.remove(&row);
            }
        }

        result
    }

    /// Clear all cells
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Get the number of populated cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of populated cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u32::MAX;
        let mut max_col = 0u32;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all populated cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellSlot)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, slot)| (row, col, slot)))
    }

    /// Iterate over populated cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u32, &CellSlot)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, slot)| (col, slot)))
    }

    /// Iterate over populated cells inside a rectangle, in row order
    ///
    /// Cost scales with the populated cells the rectangle touches, not
    /// with its area; both axes walk BTreeMap sub-ranges.
    pub fn iter_range(
        &self,
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> impl Iterator<Item = (u32, u32, &CellSlot)> {
        self.rows.range(start_row..=end_row).flat_map(move |(&row, cols)| {
            cols.range(start_col..=end_col)
                .map(move |(&col, slot)| (row, col, slot))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        storage.set(0, 0, CellSlot::new(CellContent::Number(42.0)));
        let slot = storage.get(0, 0).unwrap();
        assert_eq!(slot.content, CellContent::Number(42.0));

        assert!(storage.get(1, 1).is_none());
    }

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();

        storage.set(0, 0, CellSlot::new(CellContent::Number(42.0)));
        assert_eq!(storage.cell_count(), 1);

        // Setting back to an empty slot removes the cell
        storage.set(0, 0, CellSlot::default());
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.get(0, 0).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clearing_content_keeps_nothing() {
        let mut storage = CellStorage::new();

        storage.set_content(5, 5, CellContent::Text("x".into()));
        storage.set_content(5, 5, CellContent::Empty);
        assert!(storage.get(5, 5).is_none());
    }

    #[test]
    fn test_value_without_content() {
        let mut storage = CellStorage::new();

        // A computed value can exist on a content-less slot transiently
        storage.set_value(2, 3, CellValue::Number(7.0));
        assert_eq!(
            storage.get(2, 3).unwrap().value,
            CellValue::Number(7.0)
        );

        storage.set_value(2, 3, CellValue::Empty);
        assert!(storage.get(2, 3).is_none());
    }

    #[test]
    fn test_iter_range_visits_only_populated_cells_inside() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::Number(1.0));
        storage.set_value(5, 3, CellValue::Number(2.0));
        storage.set_value(5, 900, CellValue::Number(3.0)); // outside columns
        storage.set_value(800, 3, CellValue::Number(4.0)); // outside rows

        let hits: Vec<(u32, u32)> = storage
            .iter_range(0, 0, 100, 100)
            .map(|(row, col, _)| (row, col))
            .collect();
        assert_eq!(hits, vec![(0, 0), (5, 3)]);

        // A rectangle over millions of addresses is still just a walk
        // of the populated entries
        assert_eq!(storage.iter_range(0, 0, 1_000_000, 1_000_000).count(), 4);
        assert_eq!(storage.iter_range(10, 10, 20, 20).count(), 0);
    }

    #[test]
    fn test_used_bounds() {
        let mut storage = CellStorage::new();

        assert!(storage.used_bounds().is_none());

        storage.set(5, 3, CellSlot::new(CellContent::Number(1.0)));
        storage.set(10, 7, CellSlot::new(CellContent::Number(2.0)));
        storage.set(2, 1, CellSlot::new(CellContent::Number(3.0)));

        let (min_row, min_col, max_row, max_col) = storage.used_bounds().unwrap();
        assert_eq!(min_row, 2);
        assert_eq!(min_col, 1);
        assert_eq!(max_row, 10);
        assert_eq!(max_col, 7);
    }

    #[test]
    fn test_iteration_row_order() {
        let mut storage = CellStorage::new();

        storage.set(1, 0, CellSlot::new(CellContent::Number(3.0)));
        storage.set(0, 1, CellSlot::new(CellContent::Number(2.0)));
        storage.set(0, 0, CellSlot::new(CellContent::Number(1.0)));

        let cells: Vec<_> = storage.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    }
}
