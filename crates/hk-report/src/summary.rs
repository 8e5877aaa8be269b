use hk_model::{FailureKind, ResultSet};
use serde::Serialize;

use crate::{error::ReportError, histogram::Histogram};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p90: f64,
    pub p99: f64,
    pub p999: f64,
}

/// Everything the report prints about one run.
///
/// Only successful slots contribute to the duration statistics; failed slots
/// are counted by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    /// Successful records whose duration is NaN or infinite; they count as
    /// succeeded but are left out of the histogram, mean and percentiles.
    pub non_finite: usize,
    pub execution_failures: usize,
    pub decode_failures: usize,
    /// First failure message seen, in slot order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentiles: Option<Percentiles>,
    pub histogram: Histogram,
}

impl Summary {
    pub fn from_results(results: &ResultSet, bins: usize) -> Result<Self, ReportError> {
        let durations = results.durations();
        let histogram = Histogram::build(&durations, bins)?;

        let (mut execution_failures, mut decode_failures) = (0, 0);
        for (_, cause) in results.failures() {
            match cause.kind() {
                FailureKind::Execution => execution_failures += 1,
                FailureKind::Decode => decode_failures += 1,
            }
        }

        let percentiles = match (
            histogram.percentile(90.0),
            histogram.percentile(99.0),
            histogram.percentile(99.9),
        ) {
            (Some(p90), Some(p99), Some(p999)) => Some(Percentiles { p90, p99, p999 }),
            _ => None,
        };

        let finite: Vec<f64> = durations.iter().copied().filter(|d| d.is_finite()).collect();
        let non_finite = durations.len() - finite.len();
        let mean = (!finite.is_empty()).then(|| finite.iter().sum::<f64>() / finite.len() as f64);

        Ok(Self {
            total: results.len(),
            succeeded: durations.len(),
            non_finite,
            execution_failures,
            decode_failures,
            first_failure: results.failures().next().map(|(i, e)| format!("slot {i}: {e}")),
            mean,
            percentiles,
            histogram,
        })
    }

    #[inline]
    pub fn failed(&self) -> usize {
        self.execution_failures + self.decode_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hk_model::{InvocationError, InvocationResult, Shape};

    fn results(outcomes: Vec<hk_model::Outcome>, producers: usize, scripts: usize) -> ResultSet {
        ResultSet::from_outcomes(Shape::new(producers, scripts), outcomes).unwrap()
    }

    #[test]
    fn failed_slots_are_excluded_from_statistics() {
        let set = results(
            vec![
                Ok(InvocationResult::new(0.0, 5.0)),
                Err(InvocationError::Spawn("No such file or directory".into())),
                Ok(InvocationResult::new(0.0, 15.0)),
                Err(InvocationError::Decode("expected value".into())),
            ],
            2,
            2,
        );

        let s = Summary::from_results(&set, 10).unwrap();
        assert_eq!(s.total, 4);
        assert_eq!(s.succeeded, 2);
        assert_eq!(s.execution_failures, 1);
        assert_eq!(s.decode_failures, 1);
        assert_eq!(s.failed(), 2);
        assert_eq!(s.mean, Some(10.0));
        assert_eq!(s.histogram.count, 2);
        assert_eq!(
            s.first_failure.as_deref(),
            Some("slot 1: spawn failed: No such file or directory")
        );
    }

    #[test]
    fn non_finite_durations_are_reported_separately() {
        let set = results(
            vec![
                Ok(InvocationResult::new(0.0, 4.0)),
                Ok(InvocationResult::new(0.0, f64::INFINITY)),
                Ok(InvocationResult::new(f64::NAN, 1.0)),
                Ok(InvocationResult::new(0.0, 8.0)),
            ],
            1,
            4,
        );

        let s = Summary::from_results(&set, 10).unwrap();
        assert_eq!(s.succeeded, 4);
        assert_eq!(s.non_finite, 2);
        assert_eq!(s.histogram.count, s.succeeded - s.non_finite);
        assert_eq!(s.mean, Some(6.0));
        assert_eq!(s.failed(), 0);
    }

    #[test]
    fn all_failed_batch_has_no_statistics() {
        let set = results(vec![Err(InvocationError::KilledBySignal); 3], 1, 3);

        let s = Summary::from_results(&set, 10).unwrap();
        assert_eq!(s.succeeded, 0);
        assert_eq!(s.execution_failures, 3);
        assert!(s.histogram.is_empty());
        assert_eq!(s.mean, None);
        assert_eq!(s.percentiles, None);
    }

    #[test]
    fn constant_durations_have_flat_percentiles() {
        let set = results(vec![Ok(InvocationResult::new(0.0, 5.0)); 4], 2, 2);

        let s = Summary::from_results(&set, 10).unwrap();
        assert_eq!(
            s.percentiles,
            Some(Percentiles {
                p90: 5.0,
                p99: 5.0,
                p999: 5.0
            })
        );
    }

    #[test]
    fn serializes_without_empty_fields() {
        let set = results(vec![Ok(InvocationResult::new(1.0, 2.0))], 1, 1);
        let json = serde_json::to_value(Summary::from_results(&set, 4).unwrap()).unwrap();

        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["percentiles"]["p90"], 1.0);
        assert!(json.get("first_failure").is_none());
    }
}
