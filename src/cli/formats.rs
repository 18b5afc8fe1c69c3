/// Extension required on input and output files
pub const LOOM_EXTENSION: &str = ".loom";

/// Extension given to the default output file
pub const LIGHT_EXTENSION: &str = ".light.loom";

/// Returns the byte offset of a trailing (case-insensitive) `.loom` extension
fn loom_suffix_start(path: &str) -> Option<usize> {
    let start = path.len().checked_sub(LOOM_EXTENSION.len())?;
    path.as_bytes()[start..]
        .eq_ignore_ascii_case(LOOM_EXTENSION.as_bytes())
        .then_some(start)
}

pub fn is_loom(path: &str) -> bool {
    loom_suffix_start(path).is_some()
}

/// Replaces the `.loom` extension of `path` with `.light.loom`
pub fn light_path(path: &str) -> Option<String> {
    let start = loom_suffix_start(path)?;
    Some(format!("{}{LIGHT_EXTENSION}", &path[..start]))
}
