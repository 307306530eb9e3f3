/// An open range `(min, max)` of accepted ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max).
    ///
    /// This is the acceptance test for intersection parameters.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }
}
