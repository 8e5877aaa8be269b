use crate::{InvocationError, InvocationResult, ModelError, Outcome, Shape};

/// Completed outcomes of a run, one per slot, in slot-index order.
///
/// Invocation `(producer, script)` lives at `producer * scripts + script`.
/// The length always equals `shape.total()`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet {
    shape: Shape,
    outcomes: Vec<Outcome>,
}

impl ResultSet {
    /// Wrap fully populated outcomes. Fails if the count does not match `shape`.
    pub fn from_outcomes(shape: Shape, outcomes: Vec<Outcome>) -> Result<Self, ModelError> {
        let expected = shape.total()?;
        if outcomes.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: outcomes.len(),
            });
        }
        Ok(Self { shape, outcomes })
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    /// Outcome of invocation `(producer, script)`.
    pub fn at(&self, producer: usize, script: usize) -> Option<&Outcome> {
        self.shape
            .index_of(producer, script)
            .and_then(|i| self.outcomes.get(i))
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
    }

    /// Successful slots as `(index, record)`.
    pub fn successes(&self) -> impl Iterator<Item = (usize, &InvocationResult)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().ok().map(|r| (i, r)))
    }

    /// Failed slots as `(index, cause)`.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &InvocationError)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (i, e)))
    }

    /// Failure causes aligned with slot indices (`None` for successful slots).
    pub fn errors(&self) -> Vec<Option<&InvocationError>> {
        self.outcomes.iter().map(|o| o.as_ref().err()).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_err()).count()
    }

    /// `endDate - startDate` of every successful slot, in index order.
    pub fn durations(&self) -> Vec<f64> {
        self.successes().map(|(_, r)| r.duration()).collect()
    }
}
