use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// One of the four measurements the service classifies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl FeatureField {
    /// All fields, in wire and display order
    pub const ALL: [FeatureField; 4] = [
        FeatureField::SepalLength,
        FeatureField::SepalWidth,
        FeatureField::PetalLength,
        FeatureField::PetalWidth,
    ];

    /// The field name used on the wire and in the shell
    pub fn name(self) -> &'static str {
        match self {
            Self::SepalLength => "sepal_length",
            Self::SepalWidth => "sepal_width",
            Self::PetalLength => "petal_length",
            Self::PetalWidth => "petal_width",
        }
    }

    /// Human-readable label with unit
    pub fn label(self) -> &'static str {
        match self {
            Self::SepalLength => "Sepal Length (cm)",
            Self::SepalWidth => "Sepal Width (cm)",
            Self::PetalLength => "Petal Length (cm)",
            Self::PetalWidth => "Petal Width (cm)",
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{0}', expected one of sepal_length, sepal_width, petal_length, petal_width")]
pub struct FieldParseError(pub String);

impl FromStr for FeatureField {
    type Err = FieldParseError;

    /// Accepts the wire names, plus dashed spellings as typed on the command line
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FeatureField::ALL
            .into_iter()
            .find(|field| field.name() == normalized)
            .ok_or_else(|| FieldParseError(s.to_string()))
    }
}

/// A field value while it is being edited.
///
/// `Unset` is distinct from zero: it is what an emptied input holds, and a
/// vector with any unset field cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Unset,
    Value(f64),
}

impl FieldValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Unset => Ok(()),
        }
    }
}

/// The four-measurement record describing one specimen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub sepal_length: FieldValue,
    pub sepal_width: FieldValue,
    pub petal_length: FieldValue,
    pub petal_width: FieldValue,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new(5.1, 3.5, 1.4, 0.2)
    }
}

impl FeatureVector {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length: FieldValue::Value(sepal_length),
            sepal_width: FieldValue::Value(sepal_width),
            petal_length: FieldValue::Value(petal_length),
            petal_width: FieldValue::Value(petal_width),
        }
    }

    pub fn get(&self, field: FeatureField) -> FieldValue {
        match field {
            FeatureField::SepalLength => self.sepal_length,
            FeatureField::SepalWidth => self.sepal_width,
            FeatureField::PetalLength => self.petal_length,
            FeatureField::PetalWidth => self.petal_width,
        }
    }

    /// Returns a copy with only `field` replaced
    pub fn with(mut self, field: FeatureField, value: FieldValue) -> Self {
        let slot = match field {
            FeatureField::SepalLength => &mut self.sepal_length,
            FeatureField::SepalWidth => &mut self.sepal_width,
            FeatureField::PetalLength => &mut self.petal_length,
            FeatureField::PetalWidth => &mut self.petal_width,
        };
        *slot = value;
        self
    }

    /// Checks the submit preconditions and freezes the vector into a request.
    ///
    /// Every field must hold a finite, non-negative number. The error message
    /// names every offending field so the user can fix them in one pass.
    pub fn validate(&self) -> Result<PredictionRequest, String> {
        let mut unset = Vec::new();
        let mut negative = Vec::new();
        for field in FeatureField::ALL {
            match self.get(field) {
                FieldValue::Value(v) if !v.is_finite() => unset.push(field.name()),
                FieldValue::Value(v) if v < 0.0 => negative.push(field.name()),
                FieldValue::Value(_) => {}
                FieldValue::Unset => unset.push(field.name()),
            }
        }

        if !unset.is_empty() {
            return Err(format!("Missing or invalid value for {}", unset.join(", ")));
        }
        if !negative.is_empty() {
            return Err(format!("Value must be at least 0 for {}", negative.join(", ")));
        }

        // All four fields were checked above
        let value = |field| self.get(field).as_f64().unwrap_or_default();
        Ok(PredictionRequest {
            sepal_length: value(FeatureField::SepalLength),
            sepal_width: value(FeatureField::SepalWidth),
            petal_length: value(FeatureField::PetalLength),
            petal_width: value(FeatureField::PetalWidth),
        })
    }
}

/// Wire body of `POST /api/predict`. Only produced by [`FeatureVector::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionRequest {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
}

impl PredictionRequest {
    pub fn get(&self, field: FeatureField) -> f64 {
        match field {
            FeatureField::SepalLength => self.sepal_length,
            FeatureField::SepalWidth => self.sepal_width,
            FeatureField::PetalLength => self.petal_length,
            FeatureField::PetalWidth => self.petal_width,
        }
    }
}
