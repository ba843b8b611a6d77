//! Source of rows fed into a pipeline.
//!
//! Loading, label parsing and mask building happen elsewhere; anything that
//! can report its length and hand out rows by index can feed a pipeline.

use crate::field::Row;

/// Finite, randomly indexable collection of rows
pub trait Dataset {
    /// Returns a copy of the row at `index`
    fn get(&self, index: usize) -> Option<Row>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dataset for [Row] {
    fn get(&self, index: usize) -> Option<Row> {
        <[Row]>::get(self, index).cloned()
    }

    fn len(&self) -> usize {
        <[Row]>::len(self)
    }
}

impl Dataset for Vec<Row> {
    fn get(&self, index: usize) -> Option<Row> {
        Dataset::get(self.as_slice(), index)
    }

    fn len(&self) -> usize {
        Dataset::len(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[test]
    fn test_vec_dataset() {
        let rows = vec![
            Row::new(vec![Field::Scalar(1.0)]),
            Row::new(vec![Field::Scalar(2.0)]),
        ];

        assert_eq!(Dataset::len(&rows), 2);
        assert!(!Dataset::is_empty(&rows));
        assert_eq!(Dataset::get(&rows, 1), Some(Row::new(vec![Field::Scalar(2.0)])));
        assert_eq!(Dataset::get(&rows, 2), None);

        let empty: Vec<Row> = Vec::new();
        assert!(Dataset::is_empty(&empty));
    }
}
