//! Level curve: XP needed to complete a level.
//!
//! The curve is piecewise quadratic with three bands:
//! - Levels 1..=16: `L² + 6L`
//! - Levels 17..=31: `2.5L² − 40.5L + 360`
//! - Levels 32+: `4.5L² − 162.5L + 2220`
//!
//! Each band is truncated toward zero. The bands are not continuous at the
//! 16/17 and 31/32 boundaries and must not be smoothed.

/// XP required to complete `level`, i.e. to advance from `level` to `level + 1`.
///
/// Total over all inputs: anything below level 1 needs 0 XP.
pub fn xp_required(level: i64) -> u64 {
    let l = level as f64;
    let raw = match level {
        i64::MIN..=0 => return 0,
        1..=16 => l * l + 6.0 * l,
        17..=31 => 2.5 * l * l - 40.5 * l + 360.0,
        _ => 4.5 * l * l - 162.5 * l + 2220.0,
    };
    // `as` truncates toward zero and saturates at the integer bounds
    raw as u64
}

/// Convenience wrapper for stored (unsigned) levels
pub fn xp_required_for(level: u32) -> u64 {
    xp_required(i64::from(level))
}
