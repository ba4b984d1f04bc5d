use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

/// MeasurementSampler trait for abstracting where numeric readings come from
/// The producer only synthesizes data; real sensor input would plug in here.
pub trait MeasurementSampler: Send + Sync {
    /// Draw one value from the inclusive range
    fn sample(&self, range: RangeInclusive<f64>) -> f64;
}

/// Production implementation drawing uniform samples from the thread RNG
#[derive(Debug, Clone, Default)]
pub struct RandomSampler;

impl RandomSampler {
    pub fn new() -> Self {
        Self
    }
}

impl MeasurementSampler for RandomSampler {
    fn sample(&self, range: RangeInclusive<f64>) -> f64 {
        rand::thread_rng().gen_range(range)
    }
}

/// Test implementation returning a fixed sequence of unit fractions
///
/// Each fraction in [0, 1] is mapped linearly onto the requested range,
/// so 0.0 yields the range start and 1.0 the range end. The sequence wraps.
#[derive(Debug, Clone)]
pub struct FixedSampler {
    fractions: Vec<f64>,
    index: Arc<Mutex<usize>>,
}

impl FixedSampler {
    pub fn new(fractions: Vec<f64>) -> Self {
        Self {
            fractions,
            index: Arc::new(Mutex::new(0)),
        }
    }

    /// Always sample the same position in every range
    pub fn single(fraction: f64) -> Self {
        Self::new(vec![fraction])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        *self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MeasurementSampler for FixedSampler {
    fn sample(&self, range: RangeInclusive<f64>) -> f64 {
        let mut index = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let fraction = if self.fractions.is_empty() {
            0.0
        } else {
            self.fractions[*index % self.fractions.len()].clamp(0.0, 1.0)
        };
        *index += 1;

        let (start, end) = range.into_inner();
        start + (end - start) * fraction
    }
}
