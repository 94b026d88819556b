/// Uniform randomness consumed by the decision core.
///
/// Injected so name/skin picks and wander directions replay deterministically.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` items, `None` when empty.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let idx = (self.next_unit() * len as f64) as usize;
        Some(idx.min(len - 1))
    }

    /// Uniform sample in `[-1, 1)`.
    fn next_signed(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    pub fn next_int(&mut self, max: u32) -> u32 {
        self.next() % max
    }

    pub fn next_range_f64(&mut self, min: f64, max_exclusive: f64) -> f64 {
        debug_assert!(max_exclusive > min);
        min + self.next_unit() * (max_exclusive - min)
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.next() as f64 / 4_294_967_296.0
    }
}
