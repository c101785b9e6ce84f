use log::debug;

use crate::features::{FeatureField, FeatureVector, FieldValue};

/// Increment applied by [`InputController::step`]
pub const STEP: f64 = 0.1;

/// Owns the session's feature vector and applies edits to it.
///
/// Text that fails to parse is not committed. The field becomes
/// [`FieldValue::Unset`] and the raw text is kept as a draft so it can still be
/// shown back to the user until the next edit of that field.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    vector: FeatureVector,
    drafts: [Option<String>; 4],
}

fn slot(field: FeatureField) -> usize {
    match field {
        FeatureField::SepalLength => 0,
        FeatureField::SepalWidth => 1,
        FeatureField::PetalLength => 2,
        FeatureField::PetalWidth => 3,
    }
}

/// Parses user text into a committed value. Empty text and anything that is
/// not a finite number both become `Unset`.
pub fn parse_field_text(raw: &str) -> FieldValue {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => FieldValue::Value(v),
        _ => FieldValue::Unset,
    }
}

impl InputController {
    pub fn new(vector: FeatureVector) -> Self {
        Self {
            vector,
            drafts: Default::default(),
        }
    }

    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    /// Applies one edit and returns the updated vector.
    ///
    /// Only `field` changes. Empty or blank `raw` unsets it rather than zeroing it.
    pub fn on_field_change(&mut self, field: FeatureField, raw: &str) -> FeatureVector {
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            FieldValue::Unset
        } else {
            parse_field_text(trimmed)
        };

        self.drafts[slot(field)] = match value {
            FieldValue::Unset if !trimmed.is_empty() => {
                debug!("Rejected non-numeric input for {}: {:?}", field, raw);
                Some(raw.to_string())
            }
            _ => None,
        };

        self.vector = self.vector.with(field, value);
        self.vector
    }

    /// Moves a field by `steps` increments of [`STEP`], rounded to one decimal
    /// and clamped at zero. An unset field starts from zero.
    pub fn step(&mut self, field: FeatureField, steps: i32) -> FeatureVector {
        let current = self.vector.get(field).as_f64().unwrap_or(0.0);
        let next = ((current + STEP * steps as f64) * 10.0).round() / 10.0;
        self.drafts[slot(field)] = None;
        self.vector = self.vector.with(field, FieldValue::Value(next.max(0.0)));
        self.vector
    }

    /// Text to show in the input for `field`: the rejected draft if there is
    /// one, otherwise the committed value (empty when unset).
    pub fn display_text(&self, field: FeatureField) -> String {
        match &self.drafts[slot(field)] {
            Some(draft) => draft.clone(),
            None => self.vector.get(field).to_string(),
        }
    }

    pub fn has_draft(&self, field: FeatureField) -> bool {
        self.drafts[slot(field)].is_some()
    }
}
