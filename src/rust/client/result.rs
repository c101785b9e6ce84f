use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The most likely species
    pub species: String,
    /// Probability per known label, in the order the service sent them
    #[serde(default)]
    pub probabilities: Probabilities,
}

impl PredictionResult {
    pub fn new(species: impl Into<String>, probabilities: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            species: species.into(),
            probabilities: probabilities.into_iter().collect(),
        }
    }
}

/// Label to probability mapping that keeps the service's key order.
///
/// Values are guaranteed finite. They are not checked for range or for
/// summing to one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Probabilities(Vec<(String, f64)>);

impl Probabilities {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, p)| (label.as_str(), *p))
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, p)| *p)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, p) in &self.0 {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

struct ProbabilitiesVisitor;

impl<'de> Visitor<'de> for ProbabilitiesVisitor {
    type Value = Probabilities;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping labels to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, f64)> = Vec::with_capacity(access.size_hint().unwrap_or(3));
        while let Some((label, p)) = access.next_entry::<String, f64>()? {
            if !p.is_finite() {
                return Err(de::Error::custom(format!("probability for '{}' is not finite", label)));
            }
            // A repeated key overwrites in place, like a JSON object would
            match entries.iter_mut().find(|entry| entry.0 == label) {
                Some(entry) => entry.1 = p,
                None => entries.push((label, p)),
            }
        }
        Ok(Probabilities(entries))
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}
