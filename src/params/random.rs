/// Counter-based deterministic random source.
///
/// Every value is `|cos(k + k²)|` for some key `k`. Keys are either supplied
/// by the caller, which makes the value a pure function of the key, or taken
/// from an internal counter that advances by one per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomState {
    counter: i64,
}

impl RandomState {
    pub fn new(seed: i32) -> Self {
        Self {
            counter: seed as i64,
        }
    }

    /// Draw a value in `[0, 1]`.
    ///
    /// With `Some(key)` the counter is left alone; with `None` the current
    /// counter is used as the key and then incremented.
    pub fn random(&mut self, key: Option<f32>) -> f32 {
        match key {
            Some(key) => Self::keyed(key),
            None => self.next_auto(),
        }
    }

    /// Pure keyed draw.
    pub fn keyed(key: f32) -> f32 {
        (key + key * key).cos().abs()
    }

    fn next_auto(&mut self) -> f32 {
        let key = self.counter as f32;
        self.counter += 1;
        Self::keyed(key)
    }

    /// Key that the next automatic draw will use.
    pub fn counter(&self) -> i64 {
        self.counter
    }
}
