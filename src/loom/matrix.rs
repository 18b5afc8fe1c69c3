#[cfg(test)]
use std::ops::Range;

use anyhow::{bail, Result};
use ndarray::{s, Array2, Axis};

macro_rules! element_types {
    ($($variant:ident => $t:ty),+ $(,)?) => {
        /// On-disk element type of the main matrix
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ElementType {
            $($variant,)+
        }

        /// Dense block of the main matrix, held in its on-disk element type
        #[derive(Debug, Clone, PartialEq)]
        pub enum Matrix {
            $($variant(Array2<$t>),)+
        }

        $(
            impl From<Array2<$t>> for Matrix {
                fn from(block: Array2<$t>) -> Self {
                    Self::$variant(block)
                }
            }
        )+

        impl Matrix {
            pub fn zeros(dtype: ElementType, shape: (usize, usize)) -> Self {
                match dtype {
                    $(ElementType::$variant => Self::$variant(Array2::zeros(shape)),)+
                }
            }

            pub fn dtype(&self) -> ElementType {
                match self {
                    $(Self::$variant(_) => ElementType::$variant,)+
                }
            }

            /// Returns `(rows, columns)`
            pub fn dim(&self) -> (usize, usize) {
                match self {
                    $(Self::$variant(block) => block.dim(),)+
                }
            }

            /// Copies the columns at `positions`, in order
            pub fn select_columns(&self, positions: &[usize]) -> Self {
                match self {
                    $(Self::$variant(block) => Self::$variant(block.select(Axis(1), positions)),)+
                }
            }

            /// Overwrites the columns starting at `offset` with `block`
            pub fn assign_columns(&mut self, offset: usize, block: &Matrix) -> Result<()> {
                let (rows, columns) = self.dim();
                let (block_rows, width) = block.dim();
                if block_rows != rows || offset + width > columns {
                    bail!(
                        "Unable to place a {block_rows}x{width} block at column {offset} of a {rows}x{columns} matrix"
                    );
                }
                match (self, block) {
                    $((Self::$variant(dst), Self::$variant(src)) => {
                        dst.slice_mut(s![.., offset..offset + width]).assign(src);
                    })+
                    (dst, src) => bail!(
                        "Unable to place {:?} values into a {:?} matrix",
                        src.dtype(),
                        dst.dtype()
                    ),
                }
                Ok(())
            }

            /// Copies a contiguous range of columns
            #[cfg(test)]
            pub fn column_range(&self, columns: Range<usize>) -> Self {
                match self {
                    $(Self::$variant(block) => Self::$variant(block.slice(s![.., columns]).to_owned()),)+
                }
            }

            /// Widened copy for value assertions
            #[cfg(test)]
            pub fn to_f64(&self) -> Array2<f64> {
                match self {
                    $(Self::$variant(block) => block.mapv(|v| v as f64),)+
                }
            }
        }
    };
}

element_types! {
    Int8 => i8,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    UInt8 => u8,
    UInt16 => u16,
    UInt32 => u32,
    UInt64 => u64,
    Float32 => f32,
    Float64 => f64,
}
