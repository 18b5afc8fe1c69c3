use anyhow::{bail, Error, Result};
use log::debug;

use super::{LoomSource, Matrix};

/// Fails unless `items` is strictly ascending
pub fn ensure_ascending(items: &[usize]) -> Result<()> {
    if let Some(pair) = items.windows(2).find(|w| w[0] >= w[1]) {
        bail!(
            "Item indices must be strictly ascending, found {} before {}",
            pair[0],
            pair[1]
        );
    }
    Ok(())
}

/// Describes one block yielded by a [`Scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanChunk {
    /// Position of the first column of the block in the scan output
    pub offset: usize,
    /// Original column indices covered by the block, ascending
    pub items: Vec<usize>,
}

/// Selection-driven walk over the column axis of a [`LoomSource`].
///
/// Columns are visited in windows of [`LoomSource::batch_size`]. Within each
/// window only the span between the first and last requested item is read,
/// and the block is narrowed to the requested items before it is yielded.
/// Items that are not strictly ascending yield one error and nothing is read.
pub struct Scan<'a, S: LoomSource> {
    source: &'a S,
    items: &'a [usize],
    batch: usize,
    pos: usize,
    invalid: Option<Error>,
}
impl<'a, S: LoomSource> Scan<'a, S> {
    pub fn new(source: &'a S, items: &'a [usize]) -> Self {
        Self {
            source,
            items,
            batch: source.batch_size().max(1),
            pos: 0,
            invalid: ensure_ascending(items).err(),
        }
    }

    fn read_window(&self, selected: &[usize]) -> Result<Matrix> {
        let first = selected[0];
        let last = selected[selected.len() - 1];
        let block = self.source.read_columns(first..last + 1)?;

        // contiguous selections need no narrowing
        if selected.len() == last - first + 1 {
            return Ok(block);
        }
        let local: Vec<usize> = selected.iter().map(|idx| idx - first).collect();
        Ok(block.select_columns(&local))
    }
}
impl<S: LoomSource> Iterator for Scan<'_, S> {
    type Item = Result<(ScanChunk, Matrix)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.invalid.take() {
            self.pos = self.items.len();
            return Some(Err(err));
        }
        let start = self.pos;
        let first = *self.items.get(start)?;
        let window_end = (first / self.batch + 1) * self.batch;
        let width = self.items[start..]
            .iter()
            .take_while(|&&idx| idx < window_end)
            .count();
        let selected = &self.items[start..start + width];
        self.pos = start + width;

        debug!(
            "Scanning window {}..{window_end}: {width} selected columns",
            window_end - self.batch
        );
        let chunk = ScanChunk {
            offset: start,
            items: selected.to_vec(),
        };
        Some(self.read_window(selected).map(|block| (chunk, block)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loom::memory::{fixture, MemorySource};

    #[test]
    fn yields_one_chunk_per_window() -> Result<()> {
        let source = MemorySource::new(fixture(3, 20, &[]), 8);
        let items = [1, 2, 9, 17, 18, 19];
        let chunks = source.scan(&items).collect::<Result<Vec<_>>>()?;

        let offsets: Vec<usize> = chunks.iter().map(|(c, _)| c.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3]);
        assert_eq!(chunks[0].0.items, vec![1, 2]);
        assert_eq!(chunks[1].0.items, vec![9]);
        assert_eq!(chunks[2].0.items, vec![17, 18, 19]);
        Ok(())
    }

    #[test]
    fn reads_only_selected_spans() -> Result<()> {
        let source = MemorySource::new(fixture(2, 20, &[]), 8);
        let items = [1, 5, 16];
        let chunks = source.scan(&items).collect::<Result<Vec<_>>>()?;
        assert_eq!(source.reads(), vec![1..6, 16..17]);

        // fixture cells encode (row, column) as row * columns + column
        let block = chunks[0].1.to_f64();
        assert_eq!(block.dim(), (2, 2));
        assert_eq!(block[[0, 0]], 1.0);
        assert_eq!(block[[0, 1]], 5.0);
        assert_eq!(block[[1, 1]], 25.0);
        Ok(())
    }

    #[test]
    fn unordered_items_yield_one_error() {
        let source = MemorySource::new(fixture(2, 20, &[]), 8);
        for items in [&[5, 3][..], &[4, 4][..], &[1, 9, 2][..]] {
            let results: Vec<_> = source.scan(items).collect();
            assert_eq!(results.len(), 1);
            assert!(results[0].is_err());
        }
        assert!(source.reads().is_empty());
    }

    #[test]
    fn empty_selection_yields_nothing() {
        let source = MemorySource::new(fixture(2, 4, &[]), 8);
        assert_eq!(source.scan(&[]).count(), 0);
        assert!(source.reads().is_empty());
    }
}
