use chrono::NaiveDate;

pub type Seed = u64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rolling `hash * 31 + unit` over the UTF-16 units of `date + id`, wrapped to
/// a signed 32-bit accumulator. The absolute value is the seed.
pub fn derive_seed(date_str: &str, id: &str) -> Seed {
    let hash = date_str
        .encode_utf16()
        .chain(id.encode_utf16())
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));

    // i32::MIN has no positive i32 counterpart
    hash.unsigned_abs() as Seed
}

pub fn seed_for(date: NaiveDate, id: &str) -> Seed {
    derive_seed(&format_date(date), id)
}

/// Fractional part of `sin(seed + offset) * 10000`, always in [0, 1).
pub fn seeded_random(seed: Seed, offset: u32) -> f64 {
    let x = ((seed + offset as u64) as f64).sin() * 10000.0;
    let frac = x - x.floor();
    // x - floor(x) can round up to exactly 1.0 for tiny negative x
    if frac >= 1.0 { 0.0 } else { frac }
}

/// Maps a draw onto `0..len`, clamping the rounding edge.
pub fn pick_index(draw: f64, len: usize) -> usize {
    ((draw * len as f64).floor() as usize).min(len.saturating_sub(1))
}
