/// Source of the few random choices the game needs. Injected so tests can
/// script it.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u32() % len as u32) as usize
    }

    /// True with probability `numerator / denominator`.
    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        debug_assert!(denominator > 0);
        self.next_u32() % denominator < numerator
    }
}

/// xorshift32.
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

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    pub fn next_range(&mut self, min: i32, max_exclusive: i32) -> i32 {
        debug_assert!(max_exclusive > min);
        let span = (max_exclusive - min) as u32;
        min + (self.next() % span) as i32
    }
}

impl RandomSource for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }
}
