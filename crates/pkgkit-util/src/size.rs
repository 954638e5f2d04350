const UNIT: f64 = 1024.0;

/// Format a byte count in the nearest human-readable unit.
///
/// Bytes are printed as an integer, kilobytes rounded to a whole number
/// (ties to even), megabytes with one decimal and gigabytes with two.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_bytes(n: u64) -> String {
    if n < 1024 {
        return format!("{n} B");
    }
    let k = n as f64 / UNIT;
    if k < UNIT {
        return format!("{} KB", k.round_ties_even());
    }
    let m = k / UNIT;
    if m < UNIT {
        return format!("{m:.1} MB");
    }
    let g = m / UNIT;
    format!("{g:.2} GB")
}
