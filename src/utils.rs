use crate::error::ValidationError;

const CONTEXT_WIDTH: usize = 30;

/// Renders the `"...<before><here><after>"` excerpt used in parser errors,
/// taking up to 30 characters on each side of the byte position `pos`.
pub fn context_snippet(text: &str, pos: usize) -> String {
    let pos = pos.min(text.len());
    let (before, after) = text.split_at(floor_char_boundary(text, pos));
    let before_start = before
        .char_indices()
        .rev()
        .nth(CONTEXT_WIDTH - 1)
        .map_or(0, |(i, _)| i);
    let after: String = after.chars().take(CONTEXT_WIDTH).collect();
    format!("\"...{}<here>{}\"", &before[before_start..], after)
}

fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

const UNITS: [(char, u64); 4] = [
    ('K', 1 << 10),
    ('M', 1 << 20),
    ('G', 1 << 30),
    ('T', 1 << 40),
];

/// Converts a size with an optional unit suffix into bytes.
///
/// Accepts `B` or `iB` after the unit letter, binary multipliers
/// (`10MB` is 10 * 1024 * 1024) and decimal fractions (`1.5G`). The result
/// is truncated toward zero.
pub fn with_units_to_int(raw: &str) -> Result<u64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidBandwidth {
        value: raw.to_string(),
        reason: format!("'{raw}' {reason}"),
    };

    let mut v = raw.trim();
    if let Some(stripped) = v.strip_suffix("iB") {
        v = stripped;
    } else if let Some(stripped) = v.strip_suffix('B') {
        v = stripped;
    }

    let mut mult = 1u64;
    if let Some(last) = v.chars().last() {
        if let Some((_, m)) = UNITS
            .iter()
            .find(|(unit, _)| last.to_ascii_uppercase() == *unit)
        {
            mult = *m;
            v = &v[..v.len() - 1];
        }
    }

    if v.is_empty() {
        return Err(invalid("is not a size"));
    }
    if let Ok(n) = v.parse::<u64>() {
        return n
            .checked_mul(mult)
            .ok_or_else(|| invalid("is too large"));
    }
    let n: f64 = v.parse().map_err(|_| invalid("is not a size"))?;
    if !n.is_finite() || n < 0.0 {
        return Err(invalid("must be a non-negative size"));
    }
    let bytes = n * mult as f64;
    if bytes >= u64::MAX as f64 {
        return Err(invalid("is too large"));
    }
    Ok(bytes as u64)
}

/// Renders a byte count with the largest binary unit that divides it
/// exactly, so that `with_units_to_int(&bytes_to_human(n)) == n`.
pub fn bytes_to_human(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    for (unit, mult) in UNITS.iter().rev() {
        if bytes % mult == 0 {
            return format!("{}{unit}B", bytes / mult);
        }
    }
    format!("{bytes}B")
}
