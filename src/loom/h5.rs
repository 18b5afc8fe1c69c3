use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{Container, Dataset, File, Group, H5Type};
use log::{debug, warn};
use ndarray::{arr0, s, Array2, ArrayD, IxDyn};

use super::{AttrTable, Attribute, Connector, ElementType, GlobalAttrs, LoomData, LoomSource};
use super::{Matrix, Scalar, Values};

const MATRIX: &str = "matrix";
const COL_ATTRS: &str = "col_attrs";
const ROW_ATTRS: &str = "row_attrs";
const GLOBAL_ATTRS: &str = "attrs";
const EMPTY_GROUPS: [&str; 3] = ["layers", "row_graphs", "col_graphs"];

/// Matrix chunk edge used when writing
const CHUNK_EDGE: usize = 64;
const DEFLATE_LEVEL: u8 = 2;

/// Reads fixed-length strings through a buffer type at least as wide as the
/// stored strings; HDF5 pads or converts between fixed string sizes itself.
macro_rules! read_fixed {
    ($container:expr, $kind:ident, $len:expr, [$($cap:literal),+]) => {
        match $len {
            $(n if n <= $cap => $container
                .read_raw::<$kind<$cap>>()?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect::<Vec<_>>(),)+
            n => bail!("Fixed-length strings of {n} bytes are not supported"),
        }
    };
}

#[derive(Debug, Default, Clone, Copy)]
pub struct H5Connector;

pub struct H5Source {
    file: File,
    matrix: Dataset,
    shape: (usize, usize),
    dtype: ElementType,
}
impl H5Source {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Unable to open loom file: {}", path.display()))?;
        let matrix = file
            .dataset(MATRIX)
            .with_context(|| format!("Missing /{MATRIX} in {}", path.display()))?;
        let shape = match matrix.shape().as_slice() {
            [rows, columns] => (*rows, *columns),
            other => bail!("/{MATRIX} must be two-dimensional, found shape {other:?}"),
        };
        let dtype = element_type(&matrix.dtype()?.to_descriptor()?)?;
        debug!(
            "Opened {} with {} rows and {} columns ({dtype:?})",
            path.display(),
            shape.0,
            shape.1
        );
        Ok(Self {
            file,
            matrix,
            shape,
            dtype,
        })
    }

    fn read_block<T: H5Type>(&self, columns: &Range<usize>) -> Result<Array2<T>> {
        self.matrix
            .read_slice_2d::<T, _>(s![.., columns.start..columns.end])
            .with_context(|| format!("Unable to read columns {columns:?}"))
    }

    fn attr_table(&self, group: &str) -> Result<AttrTable> {
        let group = self.file.group(group)?;
        group
            .member_names()?
            .into_iter()
            .map(|name| {
                let attr = read_attribute(&group.dataset(&name)?)
                    .with_context(|| format!("Unable to read attribute {name}"))?;
                Ok((name, attr))
            })
            .collect()
    }
}
impl LoomSource for H5Source {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn dtype(&self) -> ElementType {
        self.dtype
    }

    fn read_columns(&self, columns: Range<usize>) -> Result<Matrix> {
        let block = match self.dtype {
            ElementType::Int8 => Matrix::Int8(self.read_block(&columns)?),
            ElementType::Int16 => Matrix::Int16(self.read_block(&columns)?),
            ElementType::Int32 => Matrix::Int32(self.read_block(&columns)?),
            ElementType::Int64 => Matrix::Int64(self.read_block(&columns)?),
            ElementType::UInt8 => Matrix::UInt8(self.read_block(&columns)?),
            ElementType::UInt16 => Matrix::UInt16(self.read_block(&columns)?),
            ElementType::UInt32 => Matrix::UInt32(self.read_block(&columns)?),
            ElementType::UInt64 => Matrix::UInt64(self.read_block(&columns)?),
            ElementType::Float32 => Matrix::Float32(self.read_block(&columns)?),
            ElementType::Float64 => Matrix::Float64(self.read_block(&columns)?),
        };
        Ok(block)
    }

    fn col_attr_keys(&self) -> Result<Vec<String>> {
        Ok(self.file.group(COL_ATTRS)?.member_names()?)
    }

    fn col_attr(&self, key: &str) -> Result<Attribute> {
        let dataset = self.file.group(COL_ATTRS)?.dataset(key)?;
        read_attribute(&dataset).with_context(|| format!("Unable to read column attribute {key}"))
    }

    fn col_attrs(&self) -> Result<AttrTable> {
        self.attr_table(COL_ATTRS)
    }

    fn row_attrs(&self) -> Result<AttrTable> {
        self.attr_table(ROW_ATTRS)
    }

    /// Collects root HDF5 attributes (loom 2) and `/attrs` datasets (loom 3)
    fn global_attrs(&self) -> Result<GlobalAttrs> {
        let mut globals = GlobalAttrs::new();
        for name in self.file.attr_names()? {
            let attr = self.file.attr(&name)?;
            insert_scalar(&mut globals, name, read_values(&attr)?);
        }
        if self.file.link_exists(GLOBAL_ATTRS) {
            let group = self.file.group(GLOBAL_ATTRS)?;
            for name in group.member_names()? {
                let dataset = group.dataset(&name)?;
                insert_scalar(&mut globals, name, read_values(&dataset)?);
            }
        }
        Ok(globals)
    }
}

impl Connector for H5Connector {
    type Source = H5Source;

    fn connect(&self, path: &Path) -> Result<H5Source> {
        H5Source::open(path)
    }

    fn create(&self, path: &Path, data: &LoomData) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Unable to create loom file: {}", path.display()))?;

        write_matrix(&file, &data.matrix)?;

        let group = file.create_group(COL_ATTRS)?;
        for (name, attr) in &data.col_attrs {
            write_attribute(&group, name, attr)?;
        }
        let group = file.create_group(ROW_ATTRS)?;
        for (name, attr) in &data.row_attrs {
            write_attribute(&group, name, attr)?;
        }
        let group = file.create_group(GLOBAL_ATTRS)?;
        for (name, value) in &data.global_attrs {
            write_scalar(&group, name, value)?;
        }
        for name in EMPTY_GROUPS {
            file.create_group(name)?;
        }

        file.close()?;
        Ok(())
    }
}

fn element_type(descriptor: &TypeDescriptor) -> Result<ElementType> {
    let dtype = match descriptor {
        TypeDescriptor::Integer(IntSize::U1) => ElementType::Int8,
        TypeDescriptor::Integer(IntSize::U2) => ElementType::Int16,
        TypeDescriptor::Integer(IntSize::U4) => ElementType::Int32,
        TypeDescriptor::Integer(IntSize::U8) => ElementType::Int64,
        TypeDescriptor::Unsigned(IntSize::U1) => ElementType::UInt8,
        TypeDescriptor::Unsigned(IntSize::U2) => ElementType::UInt16,
        TypeDescriptor::Unsigned(IntSize::U4) => ElementType::UInt32,
        TypeDescriptor::Unsigned(IntSize::U8) => ElementType::UInt64,
        TypeDescriptor::Float(FloatSize::U4) => ElementType::Float32,
        TypeDescriptor::Float(FloatSize::U8) => ElementType::Float64,
        other => bail!("Unsupported matrix element type: {other:?}"),
    };
    Ok(dtype)
}

fn read_values(container: &Container) -> Result<Values> {
    let values = match container.dtype()?.to_descriptor()? {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            Values::Int(container.read_raw::<i64>()?)
        }
        TypeDescriptor::Float(_) => Values::Float(container.read_raw::<f64>()?),
        TypeDescriptor::VarLenUnicode => Values::Text(
            container
                .read_raw::<VarLenUnicode>()?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        TypeDescriptor::VarLenAscii => Values::Text(
            container
                .read_raw::<VarLenAscii>()?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        TypeDescriptor::FixedAscii(len) => Values::Text(read_fixed!(
            container,
            FixedAscii,
            len,
            [16, 64, 256, 1024, 4096]
        )),
        TypeDescriptor::FixedUnicode(len) => Values::Text(read_fixed!(
            container,
            FixedUnicode,
            len,
            [16, 64, 256, 1024, 4096]
        )),
        other => bail!("Unsupported attribute type: {other:?}"),
    };
    Ok(values)
}

fn read_attribute(dataset: &Dataset) -> Result<Attribute> {
    let width = match dataset.shape().as_slice() {
        [_] => 1,
        [_, width] => *width,
        other => bail!("Attributes with shape {other:?} are not supported"),
    };
    Attribute::new(read_values(dataset)?, width)
}

fn insert_scalar(globals: &mut GlobalAttrs, name: String, values: Values) {
    let scalar = match values {
        Values::Int(v) if v.len() == 1 => Scalar::Int(v[0]),
        Values::Float(v) if v.len() == 1 => Scalar::Float(v[0]),
        Values::Text(mut v) if v.len() == 1 => Scalar::Text(v.remove(0)),
        _ => {
            warn!("Global attribute {name} is not a scalar and will not be copied");
            return;
        }
    };
    globals.insert(name, scalar);
}

fn write_matrix(file: &File, matrix: &Matrix) -> Result<()> {
    match matrix {
        Matrix::Int8(block) => write_block(file, block),
        Matrix::Int16(block) => write_block(file, block),
        Matrix::Int32(block) => write_block(file, block),
        Matrix::Int64(block) => write_block(file, block),
        Matrix::UInt8(block) => write_block(file, block),
        Matrix::UInt16(block) => write_block(file, block),
        Matrix::UInt32(block) => write_block(file, block),
        Matrix::UInt64(block) => write_block(file, block),
        Matrix::Float32(block) => write_block(file, block),
        Matrix::Float64(block) => write_block(file, block),
    }
}

fn write_block<T: H5Type>(file: &File, block: &Array2<T>) -> Result<()> {
    let (rows, columns) = block.dim();
    let chunk = (rows.clamp(1, CHUNK_EDGE), columns.clamp(1, CHUNK_EDGE));
    file.new_dataset_builder()
        .with_data(block)
        .chunk(chunk)
        .deflate(DEFLATE_LEVEL)
        .create(MATRIX)
        .context("Unable to write the main matrix")?;
    Ok(())
}

fn write_array<T: H5Type>(group: &Group, name: &str, shape: &[usize], data: Vec<T>) -> Result<()> {
    let array = ArrayD::from_shape_vec(IxDyn(shape), data)?;
    group.new_dataset_builder().with_data(&array).create(name)?;
    Ok(())
}

fn to_varlen(value: &str) -> Result<VarLenUnicode> {
    VarLenUnicode::from_str(value).map_err(|err| anyhow!("Invalid string {value:?}: {err}"))
}

fn write_attribute(group: &Group, name: &str, attr: &Attribute) -> Result<()> {
    let shape = if attr.width() == 1 {
        vec![attr.len()]
    } else {
        vec![attr.len(), attr.width()]
    };
    let written = match attr.values() {
        Values::Int(v) => write_array(group, name, &shape, v.clone()),
        Values::Float(v) => write_array(group, name, &shape, v.clone()),
        Values::Text(v) => {
            let strings = v.iter().map(|s| to_varlen(s)).collect::<Result<Vec<_>>>()?;
            write_array(group, name, &shape, strings)
        }
    };
    written.with_context(|| format!("Unable to write attribute {name}"))
}

fn write_scalar(group: &Group, name: &str, value: &Scalar) -> Result<()> {
    let builder = group.new_dataset_builder();
    match value {
        Scalar::Int(v) => builder.with_data(&arr0(*v)).create(name)?,
        Scalar::Float(v) => builder.with_data(&arr0(*v)).create(name)?,
        Scalar::Text(v) => builder.with_data(&arr0(to_varlen(v)?)).create(name)?,
    };
    Ok(())
}
