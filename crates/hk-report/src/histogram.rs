use serde::Serialize;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]` of the samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub buckets: Vec<Bucket>,
}

impl Histogram {
    /// Bucket `samples` into `bins` equal-width buckets.
    ///
    /// Non-finite samples are skipped. When every sample is equal there is a
    /// single bucket holding all of them.
    pub fn build(samples: &[f64], bins: usize) -> Result<Self, ReportError> {
        if bins == 0 {
            return Err(ReportError::ZeroBins);
        }

        let values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        let Some(&first) = values.first() else {
            return Ok(Self::default());
        };
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if min == max {
            return Ok(Self {
                min,
                max,
                count: values.len(),
                buckets: vec![Bucket {
                    min,
                    max,
                    count: values.len(),
                }],
            });
        }

        let scale = (max - min) / bins as f64;
        let mut buckets: Vec<Bucket> = (0..bins)
            .map(|i| Bucket {
                min: min + i as f64 * scale,
                max: min + (i + 1) as f64 * scale,
                count: 0,
            })
            .collect();

        for v in &values {
            // The maximum sample falls exactly on the upper edge; clamp it into the last bucket.
            let i = (((v - min) / scale) as usize).min(bins - 1);
            buckets[i].count += 1;
        }

        Ok(Self {
            min,
            max,
            count: values.len(),
            buckets,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Upper edge of the first bucket whose cumulative count reaches
    /// `floor(count * percentile / 100)`.
    ///
    /// Bucket resolution only: the answer is always some bucket's `max`.
    pub fn percentile(&self, percentile: f64) -> Option<f64> {
        let last = self.buckets.last()?;
        let wanted = (self.count as f64 * percentile / 100.0).floor() as usize;

        let mut seen = 0;
        for bucket in &self.buckets {
            seen += bucket.count;
            if seen >= wanted {
                return Some(bucket.max);
            }
        }
        Some(last.max)
    }

    pub fn max_bucket_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}
