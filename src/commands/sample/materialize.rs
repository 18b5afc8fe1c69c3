use anyhow::{bail, Context, Result};
use log::debug;

use crate::loom::{ensure_ascending, LoomData, LoomSource, Matrix, Scalar, SPEC_VERSION_KEY};

/// Ensures the indices are strictly ascending and within `0..num_items`
fn check_indices(indices: &[usize], num_items: usize) -> Result<()> {
    ensure_ascending(indices)?;
    if let Some(&last) = indices.last() {
        if last >= num_items {
            bail!("Item index {last} is out of bounds for {num_items} items");
        }
    }
    Ok(())
}

/// Reads the selected columns of the source matrix into a dense block.
///
/// The block keeps the source element type and is filled in place as the
/// scan advances.
pub fn materialize<S: LoomSource>(source: &S, indices: &[usize]) -> Result<Matrix> {
    let (rows, columns) = source.shape();
    check_indices(indices, columns)?;

    let mut matrix = Matrix::zeros(source.dtype(), (rows, indices.len()));
    for chunk in source.scan(indices) {
        let (chunk, block) = chunk?;
        if block.dim() != (rows, chunk.items.len()) {
            bail!(
                "Scan returned a block of shape {:?} for {} columns at offset {}",
                block.dim(),
                chunk.items.len(),
                chunk.offset
            );
        }
        debug!(
            "Read {} columns at output offset {}",
            chunk.items.len(),
            chunk.offset
        );
        matrix
            .assign_columns(chunk.offset, &block)
            .context("Unable to assemble sampled columns")?;
    }
    Ok(matrix)
}

/// Assembles the output file contents around a sampled matrix.
///
/// Column attributes are resliced by `indices`, row and global attributes are
/// copied and the format version is restamped with `version`.
pub fn project<S: LoomSource>(
    source: &S,
    matrix: Matrix,
    indices: &[usize],
    version: &str,
) -> Result<LoomData> {
    let col_attrs = source
        .col_attrs()?
        .into_iter()
        .map(|(key, attr)| {
            let attr = attr
                .select(indices)
                .with_context(|| format!("Unable to sample column attribute {key}"))?;
            Ok((key, attr))
        })
        .collect::<Result<_>>()?;

    let mut global_attrs = source.global_attrs()?;
    global_attrs.insert(SPEC_VERSION_KEY.to_string(), Scalar::from(version));

    Ok(LoomData {
        matrix,
        row_attrs: source.row_attrs()?,
        col_attrs,
        global_attrs,
    })
}
