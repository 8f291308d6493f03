use chrono::{Datelike, NaiveDate};

/// Prime modulus of the multiplicative mix.
pub const MIX_PRIME: i64 = 982_451_653;
/// LCG multiplier (Numerical Recipes constants).
pub const LCG_MULTIPLIER: i64 = 1_664_525;
pub const LCG_INCREMENT: i64 = 1_013_904_223;
pub const LCG_MODULUS: i64 = 1 << 32;

/// Selection input derived from one calendar day.
///
/// `seed = year * 1000 + day_of_year`, then
/// `mixed = (seed * 31 + day_of_year * 17 + year * 7) mod MIX_PRIME`, then one
/// LCG step `scrambled = (LCG_MULTIPLIER * mixed + LCG_INCREMENT) mod 2^32`.
/// Different days may scramble to the same index; only determinism matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSeed {
    pub year: i32,
    pub day_of_year: u32,
    pub seed: i64,
    pub mixed: i64,
    pub scrambled: u32,
}

impl DateSeed {
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_day_of_year(date.ordinal(), date.year())
    }

    /// Seed for a 1-based day ordinal. The ordinal is not range checked.
    pub fn from_day_of_year(day_of_year: u32, year: i32) -> Self {
        let y = i64::from(year);
        let d = i64::from(day_of_year);

        let seed = y * 1000 + d;
        let mixed = (seed * 31 + d * 17 + y * 7).rem_euclid(MIX_PRIME);
        // mixed < MIX_PRIME keeps the product well inside i64
        let scrambled = (LCG_MULTIPLIER * mixed + LCG_INCREMENT).rem_euclid(LCG_MODULUS);

        DateSeed {
            year,
            day_of_year,
            seed,
            mixed,
            scrambled: scrambled as u32,
        }
    }

    /// Index into a list of `len` items, or `None` for an empty list.
    pub fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((u64::from(self.scrambled) % len as u64) as usize)
    }
}
