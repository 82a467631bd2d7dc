pub struct Statistics;

/// Smallest, largest and midpoint of a set of values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub max: f64,
    /// `(min + max) / 2`, not the arithmetic mean.
    pub mid: f64,
}

impl Statistics {
    /// Arithmetic mean. NaN values are ignored.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for &v in values {
            if v.is_nan() {
                continue;
            }
            sum += v;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(sum / n as f64)
    }

    /// NaN values never win a comparison and are skipped.
    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let mut it = values.iter().copied().filter(|v| !v.is_nan());
        let first = it.next()?;
        let mut min = first;
        let mut max = first;
        for v in it {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }

    pub fn spread(values: &[f64]) -> Option<Spread> {
        let (min, max) = Self::min_max(values)?;
        Some(Spread {
            min,
            max,
            mid: (min + max) / 2.0,
        })
    }
}
