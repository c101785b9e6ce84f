use crate::client::PredictionResult;

/// Narrowest bar drawn, in percent, so near-zero classes stay visible
pub const MIN_BAR_WIDTH_PERCENT: f64 = 3.0;

/// One row of the probability chart
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityBar {
    pub label: String,
    pub probability: f64,
    /// Probability as a percentage with one decimal, e.g. `"91.0%"`
    pub percent_text: String,
    /// Bar length in percent of the full width, never below [`MIN_BAR_WIDTH_PERCENT`]
    pub bar_width_percent: f64,
}

/// Turns a prediction into chart rows, in the order the service returned them.
pub fn present(result: &PredictionResult) -> Vec<ProbabilityBar> {
    result
        .probabilities
        .iter()
        .map(|(label, probability)| {
            let percent = probability * 100.0;
            ProbabilityBar {
                label: label.to_string(),
                probability,
                // Half tenths round up, so 1.25 shows as 1.3
                percent_text: format!("{:.1}%", (percent * 10.0).round() / 10.0),
                bar_width_percent: percent.max(MIN_BAR_WIDTH_PERCENT),
            }
        })
        .collect()
}

/// Uppercases the first character, for labels like `versicolor`
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
