//! In-memory connector used by the unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use ndarray::Array2;

use super::{
    AttrTable, Attribute, Connector, ElementType, GlobalAttrs, LoomData, LoomSource, Matrix,
    Scalar, SCAN_BATCH,
};

/// Builds a float32 loom dataset whose cell at `(row, column)` holds `row * columns + column`.
///
/// Every file carries a `CellID` column attribute, a `Gene` row attribute and
/// two global attributes, plus the given extra column attributes.
pub fn fixture(rows: usize, columns: usize, col_attrs: &[(&str, &[&str])]) -> LoomData {
    let matrix = Array2::from_shape_fn((rows, columns), |(r, c)| (r * columns + c) as f32);

    let mut cols = AttrTable::new();
    cols.insert(
        "CellID".to_string(),
        Attribute::text((0..columns).map(|c| format!("cell{c}"))),
    );
    for (key, values) in col_attrs {
        assert_eq!(values.len(), columns, "fixture attribute {key} is misaligned");
        cols.insert((*key).to_string(), Attribute::text(values.iter().copied()));
    }

    let mut row_attrs = AttrTable::new();
    row_attrs.insert(
        "Gene".to_string(),
        Attribute::text((0..rows).map(|r| format!("gene{r}"))),
    );

    let mut global_attrs = GlobalAttrs::new();
    global_attrs.insert("title".to_string(), Scalar::from("fixture"));
    global_attrs.insert("LOOM_SPEC_VERSION".to_string(), Scalar::from("2.0.1"));

    LoomData {
        matrix: Matrix::from(matrix),
        row_attrs,
        col_attrs: cols,
        global_attrs,
    }
}

pub struct MemorySource {
    data: LoomData,
    batch_size: usize,
    reads: RefCell<Vec<Range<usize>>>,
}
impl MemorySource {
    pub fn new(data: LoomData, batch_size: usize) -> Self {
        Self {
            data,
            batch_size,
            reads: RefCell::new(Vec::new()),
        }
    }

    /// Column ranges requested through [`LoomSource::read_columns`]
    pub fn reads(&self) -> Vec<Range<usize>> {
        self.reads.borrow().clone()
    }
}
impl LoomSource for MemorySource {
    fn shape(&self) -> (usize, usize) {
        self.data.matrix.dim()
    }

    fn dtype(&self) -> ElementType {
        self.data.matrix.dtype()
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn read_columns(&self, columns: Range<usize>) -> Result<Matrix> {
        if columns.end > self.data.matrix.dim().1 {
            bail!("Column range {columns:?} is out of bounds");
        }
        self.reads.borrow_mut().push(columns.clone());
        Ok(self.data.matrix.column_range(columns))
    }

    fn col_attr_keys(&self) -> Result<Vec<String>> {
        Ok(self.data.col_attrs.keys().cloned().collect())
    }

    fn col_attr(&self, key: &str) -> Result<Attribute> {
        self.data
            .col_attrs
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("Missing column attribute: {key}"))
    }

    fn row_attrs(&self) -> Result<AttrTable> {
        Ok(self.data.row_attrs.clone())
    }

    fn global_attrs(&self) -> Result<GlobalAttrs> {
        Ok(self.data.global_attrs.clone())
    }
}

/// Keeps loom files in a map keyed by path
pub struct MemoryConnector {
    files: RefCell<HashMap<PathBuf, LoomData>>,
    batch_size: usize,
    connections: Cell<usize>,
}
impl MemoryConnector {
    pub fn new() -> Self {
        Self::with_batch_size(SCAN_BATCH)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            batch_size,
            connections: Cell::new(0),
        }
    }

    pub fn insert(&self, path: impl Into<PathBuf>, data: LoomData) {
        self.files.borrow_mut().insert(path.into(), data);
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<LoomData> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn num_files(&self) -> usize {
        self.files.borrow().len()
    }

    /// Number of successful `connect` calls
    pub fn connections(&self) -> usize {
        self.connections.get()
    }
}
impl Connector for MemoryConnector {
    type Source = MemorySource;

    fn connect(&self, path: &Path) -> Result<MemorySource> {
        let data = self
            .get(path)
            .ok_or_else(|| anyhow!("No such file: {}", path.display()))?;
        self.connections.set(self.connections.get() + 1);
        Ok(MemorySource::new(data, self.batch_size))
    }

    fn create(&self, path: &Path, data: &LoomData) -> Result<()> {
        self.insert(path, data.clone());
        Ok(())
    }

    fn version(&self) -> &str {
        "3.0.7"
    }
}
