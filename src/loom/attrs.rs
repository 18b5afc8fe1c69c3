use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};

/// Named attribute arrays aligned to one axis of the matrix
pub type AttrTable = BTreeMap<String, Attribute>;

/// Named scalar attributes of the whole file
pub type GlobalAttrs = BTreeMap<String, Scalar>;

/// Flattened, row-major attribute values
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}
impl Values {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }
}

/// An attribute array whose first axis is aligned to rows or columns.
///
/// Two-dimensional attributes (e.g. embeddings) are stored flattened with
/// `width` values per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    values: Values,
    width: usize,
}
impl Attribute {
    pub fn new(values: Values, width: usize) -> Result<Self> {
        if width == 0 {
            bail!("Attribute width must be at least 1");
        }
        if values.len() % width != 0 {
            bail!(
                "Attribute of {} values can not be split into entries of width {width}",
                values.len()
            );
        }
        Ok(Self { values, width })
    }

    pub fn text<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: Values::Text(values.into_iter().map(Into::into).collect()),
            width: 1,
        }
    }

    #[cfg(test)]
    pub fn ints(values: Vec<i64>) -> Self {
        Self {
            values: Values::Int(values),
            width: 1,
        }
    }

    #[cfg(test)]
    pub fn floats(values: Vec<f64>) -> Self {
        Self {
            values: Values::Float(values),
            width: 1,
        }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of entries along the aligned axis
    pub fn len(&self) -> usize {
        self.values.len() / self.width
    }

    /// Reslices the attribute along its aligned axis, keeping the order of `indices`
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let len = self.len();
        if let Some(idx) = indices.iter().find(|&&idx| idx >= len) {
            bail!("Index {idx} is out of bounds for an attribute of length {len}");
        }
        let values = match &self.values {
            Values::Int(v) => Values::Int(take_entries(v, self.width, indices)),
            Values::Float(v) => Values::Float(take_entries(v, self.width, indices)),
            Values::Text(v) => Values::Text(take_entries(v, self.width, indices)),
        };
        Ok(Self {
            values,
            width: self.width,
        })
    }

    /// Renders every entry as a category label.
    ///
    /// Returns `None` for multi-column attributes.
    pub fn labels(&self) -> Option<Vec<String>> {
        if self.width != 1 {
            return None;
        }
        let labels = match &self.values {
            Values::Int(v) => v.iter().map(ToString::to_string).collect(),
            Values::Float(v) => v.iter().map(ToString::to_string).collect(),
            Values::Text(v) => v.clone(),
        };
        Some(labels)
    }
}

fn take_entries<T: Clone>(data: &[T], width: usize, indices: &[usize]) -> Vec<T> {
    let mut out = Vec::with_capacity(indices.len() * width);
    for &idx in indices {
        out.extend_from_slice(&data[idx * width..(idx + 1) * width]);
    }
    out
}

/// A single global attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}
impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
