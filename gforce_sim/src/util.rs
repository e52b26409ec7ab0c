/// Tiny xorshift PRNG; deterministic for a given seed so simulated runs are repeatable.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[-amp, +amp]`.
    pub fn symmetric(&mut self, amp: f64) -> f64 {
        let unit = f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0);
        (unit * 2.0 - 1.0) * amp
    }
}
