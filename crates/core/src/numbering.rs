//! Sequential document numbering.

/// Next document number for a collection: one past the largest existing number
/// that parses as an unsigned integer. Numbers that do not parse (legacy or
/// hand-edited data) are skipped rather than rejected.
pub fn next_number<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|n| n.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}
