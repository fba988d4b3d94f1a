use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Stateless random source keyed by absolute coordinates.
///
/// Every draw is a pure function of `(seed, x, y, z, n)`; there is no internal state to advance,
/// so the same coordinate yields the same value on every thread and in every tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CoordRandom {
    seed: u64,
}

impl CoordRandom {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            seed: u64::from(seed),
        }
    }

    pub(crate) fn u64_at(self, x: i32, y: i32, z: i32, n: i32) -> u64 {
        let mut key = [0u8; 16];
        key[0..4].copy_from_slice(&x.to_le_bytes());
        key[4..8].copy_from_slice(&y.to_le_bytes());
        key[8..12].copy_from_slice(&z.to_le_bytes());
        key[12..16].copy_from_slice(&n.to_le_bytes());
        xxh3_64_with_seed(&key, self.seed)
    }

    /// Integer in `[min, max)`. Returns `min` for an empty range.
    pub(crate) fn int_range(self, x: i32, y: i32, z: i32, n: i32, min: i32, max: i32) -> i32 {
        let span = i64::from(max) - i64::from(min);
        if span <= 0 {
            return min;
        }
        let r = self.u64_at(x, y, z, n) % (span as u64);
        (i64::from(min) + r as i64) as i32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
