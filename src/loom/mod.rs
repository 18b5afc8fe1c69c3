mod attrs;
#[cfg(feature = "hdf5")]
mod h5;
mod matrix;
#[cfg(test)]
pub mod memory;
mod scan;

pub use attrs::{AttrTable, Attribute, GlobalAttrs, Scalar, Values};
pub use matrix::{ElementType, Matrix};
pub use scan::{ensure_ascending, Scan};

use std::ops::Range;
use std::path::Path;

use anyhow::Result;

/// Version written into the `LOOM_SPEC_VERSION` global attribute of new files
pub const LOOM_SPEC_VERSION: &str = "3.0.0";

/// Global attribute holding the format version of a loom file
pub const SPEC_VERSION_KEY: &str = "LOOM_SPEC_VERSION";

/// Number of columns covered by a single scan window
pub const SCAN_BATCH: usize = 512;

#[cfg(feature = "hdf5")]
pub type DefaultConnector = h5::H5Connector;

#[cfg(not(feature = "hdf5"))]
pub type DefaultConnector = unavailable::Unavailable;

/// Everything needed to create a loom file in one shot
#[derive(Debug, Clone, PartialEq)]
pub struct LoomData {
    /// Dense matrix of shape (rows, columns)
    pub matrix: Matrix,
    pub row_attrs: AttrTable,
    pub col_attrs: AttrTable,
    pub global_attrs: GlobalAttrs,
}

/// Read-only view over an open loom file
pub trait LoomSource {
    /// Returns `(rows, columns)` of the main matrix
    fn shape(&self) -> (usize, usize);

    fn dtype(&self) -> ElementType;

    /// Width of the column windows walked by [`LoomSource::scan`]
    fn batch_size(&self) -> usize {
        SCAN_BATCH
    }

    /// Reads every row of a contiguous range of columns in the source element type
    fn read_columns(&self, columns: Range<usize>) -> Result<Matrix>;

    fn col_attr_keys(&self) -> Result<Vec<String>>;

    fn col_attr(&self, key: &str) -> Result<Attribute>;

    fn col_attrs(&self) -> Result<AttrTable> {
        self.col_attr_keys()?
            .into_iter()
            .map(|key| {
                let attr = self.col_attr(&key)?;
                Ok((key, attr))
            })
            .collect()
    }

    fn row_attrs(&self) -> Result<AttrTable>;

    fn global_attrs(&self) -> Result<GlobalAttrs>;

    /// Walks the column axis yielding only the requested items.
    ///
    /// `items` must be strictly ascending, otherwise the scan yields a single error.
    fn scan<'a>(&'a self, items: &'a [usize]) -> Scan<'a, Self>
    where
        Self: Sized,
    {
        Scan::new(self, items)
    }
}

/// Opens existing loom files and creates new ones
pub trait Connector {
    type Source: LoomSource;

    /// Opens `path` read-only. The file is released when the source is dropped.
    fn connect(&self, path: &Path) -> Result<Self::Source>;

    /// Creates a new loom file at `path` from in-memory arrays
    fn create(&self, path: &Path, data: &LoomData) -> Result<()>;

    /// Version stamped into created files
    fn version(&self) -> &str {
        LOOM_SPEC_VERSION
    }
}

#[cfg(not(feature = "hdf5"))]
mod unavailable {
    use std::ops::Range;
    use std::path::Path;

    use anyhow::{bail, Result};

    use super::{
        AttrTable, Attribute, Connector, ElementType, GlobalAttrs, LoomData, LoomSource, Matrix,
    };

    const MISSING_BACKEND: &str =
        "loomsample was built without the default `hdf5` feature";

    /// Connector used when no storage backend is compiled in
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Unavailable;

    /// Never constructed
    pub enum NoSource {}

    impl LoomSource for NoSource {
        fn shape(&self) -> (usize, usize) {
            match *self {}
        }
        fn dtype(&self) -> ElementType {
            match *self {}
        }
        fn read_columns(&self, _columns: Range<usize>) -> Result<Matrix> {
            match *self {}
        }
        fn col_attr_keys(&self) -> Result<Vec<String>> {
            match *self {}
        }
        fn col_attr(&self, _key: &str) -> Result<Attribute> {
            match *self {}
        }
        fn row_attrs(&self) -> Result<AttrTable> {
            match *self {}
        }
        fn global_attrs(&self) -> Result<GlobalAttrs> {
            match *self {}
        }
    }

    impl Connector for Unavailable {
        type Source = NoSource;

        fn connect(&self, path: &Path) -> Result<NoSource> {
            bail!("Unable to open {}: {MISSING_BACKEND}", path.display())
        }

        fn create(&self, path: &Path, _data: &LoomData) -> Result<()> {
            bail!("Unable to create {}: {MISSING_BACKEND}", path.display())
        }
    }
}
