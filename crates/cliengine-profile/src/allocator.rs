//! Collision-free profile identifier allocation.
//!
//! Identifiers are compared as opaque strings. When the desired base is
//! taken, candidates `base_1`, `base_2`, ... are probed in order. A base that
//! already looks suffixed is not parsed: requesting `a_1` when `a_1` exists
//! yields `a_1_1`, not `a_2`. The guarantee is "no collision", not "minimal
//! surprise".

use std::collections::HashSet;

/// Return `desired_base` if free, else the first free `desired_base_k`,
/// k = 1, 2, 3, ...
pub fn allocate(desired_base: &str, existing: &HashSet<String>) -> String {
    allocate_with(desired_base, |candidate| existing.contains(candidate))
}

/// [`allocate`] against an arbitrary occupancy test.
pub fn allocate_with(desired_base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(desired_base) {
        return desired_base.to_string();
    }
    let mut k: u64 = 1;
    loop {
        let candidate = format!("{desired_base}_{k}");
        if !is_taken(&candidate) {
            return candidate;
        }
        k += 1;
    }
}

/// Allocate against a listing of record file names.
///
/// Names ending in `.{extension}` contribute their stem to the occupied set;
/// other names are ignored. The returned name carries the extension.
pub fn allocate_file_name<I, S>(desired_base: &str, file_names: I, extension: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let existing: HashSet<String> = file_names
        .into_iter()
        .filter_map(|name| strip_extension(name.as_ref(), extension).map(str::to_string))
        .collect();
    record_file_name(&allocate(desired_base, &existing), extension)
}

/// `id.extension`.
pub fn record_file_name(id: &str, extension: &str) -> String {
    format!("{id}.{extension}")
}

/// The stem of `file_name` if it ends in `.{extension}`.
pub fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
}
