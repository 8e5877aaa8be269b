use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, Visitor},
};

use crate::{InvocationError, ModelError};

/// Timing record printed by a producer on stdout.
///
/// Units are whatever the producer uses; only the difference is meaningful.
/// Only the object form decodes: `[0, 5]` is not a record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub start_date: f64,
    pub end_date: f64,
}

impl InvocationResult {
    pub fn new(start_date: f64, end_date: f64) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// `endDate - startDate`.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_date - self.start_date
    }
}

const START_DATE: &str = "startDate";
const END_DATE: &str = "endDate";

impl<'de> Deserialize<'de> for InvocationResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = InvocationResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with numeric `startDate` and `endDate` fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut start_date = None;
        let mut end_date = None;
        while let Some(key) = map.next_key::<String>()? {
            let slot = match key.as_str() {
                START_DATE => &mut start_date,
                END_DATE => &mut end_date,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if slot.is_some() {
                return Err(de::Error::custom(format_args!("duplicate field `{key}`")));
            }
            *slot = Some(map.next_value::<f64>()?);
        }
        let missing = <A::Error as de::Error>::missing_field;
        Ok(InvocationResult {
            start_date: start_date.ok_or_else(|| missing(START_DATE))?,
            end_date: end_date.ok_or_else(|| missing(END_DATE))?,
        })
    }
}

/// Outcome of one invocation: exactly one per slot.
pub type Outcome = Result<InvocationResult, InvocationError>;

/// Dimensions of a run: `producers x scripts` invocations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Shape {
    pub producers: usize,
    pub scripts: usize,
}

impl Shape {
    pub fn new(producers: usize, scripts: usize) -> Self {
        Self { producers, scripts }
    }

    /// Total number of invocations, or an error if it does not fit in `usize`.
    pub fn total(&self) -> Result<usize, ModelError> {
        self.producers
            .checked_mul(self.scripts)
            .ok_or(ModelError::ShapeOverflow {
                producers: self.producers,
                scripts: self.scripts,
            })
    }

    /// Linear slot index of `(producer, script)`, if it lies inside the shape.
    #[inline]
    pub fn index_of(&self, producer: usize, script: usize) -> Option<usize> {
        if producer >= self.producers || script >= self.scripts {
            return None;
        }
        Some(producer * self.scripts + script)
    }

    /// All invocation ids in launch order: producer-major, script-minor.
    pub fn ids(self) -> impl Iterator<Item = InvocationId> {
        let Shape { producers, scripts } = self;
        (0..producers)
            .flat_map(move |p| (0..scripts).map(move |s| InvocationId::new(p, s, scripts)))
    }
}

/// Coordinates of one invocation and the slot it writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InvocationId {
    pub producer: usize,
    pub script: usize,
    pub index: usize,
}

impl InvocationId {
    /// `index = producer * scripts + script`.
    pub fn new(producer: usize, script: usize, scripts: usize) -> Self {
        Self {
            producer,
            script,
            index: producer * scripts + script,
        }
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}/s{}#{}", self.producer, self.script, self.index)
    }
}
