//! Plain-text rendering of a session snapshot for the terminal shell.

use std::fmt::Write as _;

use crate::features::FeatureField;
use crate::presenter::{capitalize, present};
use crate::state::Snapshot;

/// Character cells of a 100% bar
pub const BAR_CELLS: usize = 40;

pub const IDLE_PROMPT: &str = "Run `predict` to see the predicted species and probabilities.";
pub const SUBMIT_LABEL: &str = "Predict Species";
pub const BUSY_LABEL: &str = "Predicting…";

fn bar(width_percent: f64) -> String {
    let cells = ((width_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let cells = cells.clamp(1, BAR_CELLS);
    format!("{}{}", "█".repeat(cells), "░".repeat(BAR_CELLS - cells))
}

/// The four inputs with their current text
pub fn render_inputs(snapshot: &Snapshot<'_>) -> String {
    let mut out = String::new();
    for field in FeatureField::ALL {
        let text = snapshot.inputs.display_text(field);
        let marker = if snapshot.inputs.has_draft(field) { "  (not a number)" } else { "" };
        let text = if text.is_empty() { "-".to_string() } else { text };
        let _ = writeln!(out, "  {:<14}{:<20}{}{}", field.name(), field.label(), text, marker);
    }
    out
}

/// The result panel: prompt, busy notice, error or prediction
pub fn render_outcome(snapshot: &Snapshot<'_>) -> String {
    let mut out = String::new();

    if snapshot.loading {
        let _ = writeln!(out, "{}", BUSY_LABEL);
        return out;
    }

    if let Some(error) = snapshot.error {
        let _ = writeln!(out, "Error: {}", error);
        return out;
    }

    let Some(result) = snapshot.result else {
        let _ = writeln!(out, "{}", IDLE_PROMPT);
        return out;
    };

    let _ = writeln!(out, "Prediction");
    let _ = writeln!(out, "  Most likely species: {}", capitalize(&result.species));
    let bars = present(result);
    if !bars.is_empty() {
        let _ = writeln!(out, "Probabilities");
        let width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        for row in bars {
            let _ = writeln!(
                out,
                "  {:<width$}  {}  {:>6}",
                capitalize(&row.label),
                bar(row.bar_width_percent),
                row.percent_text,
                width = width
            );
        }
    }
    out
}

/// A full frame: title, backend, inputs, submit control and result panel
pub fn render(snapshot: &Snapshot<'_>, backend: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Iris Flower Classifier");
    let _ = writeln!(out, "Backend: {}", backend);
    let _ = writeln!(out);
    out.push_str(&render_inputs(snapshot));
    let label = if snapshot.loading { BUSY_LABEL } else { SUBMIT_LABEL };
    let _ = writeln!(out, "[ {} ]", label);
    let _ = writeln!(out);
    out.push_str(&render_outcome(snapshot));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, PredictionResult};
    use crate::state::{InteractionStateMachine, SubmitTicket};

    fn versicolor() -> PredictionResult {
        PredictionResult::new(
            "versicolor",
            vec![
                ("setosa".to_string(), 0.02),
                ("versicolor".to_string(), 0.91),
                ("virginica".to_string(), 0.07),
            ],
        )
    }

    #[test]
    fn test_idle_frame() {
        let machine = InteractionStateMachine::default();
        let frame = render(&machine.snapshot(), "http://localhost:8000");
        assert!(frame.contains("Backend: http://localhost:8000"));
        assert!(frame.contains("[ Predict Species ]"));
        assert!(frame.contains(IDLE_PROMPT));
        assert!(frame.contains("sepal_length"));
        assert!(frame.contains("5.1"));
    }

    #[test]
    fn test_busy_frame() {
        let mut machine = InteractionStateMachine::default();
        assert!(matches!(machine.begin_submit(), SubmitTicket::Started(_)));
        let frame = render(&machine.snapshot(), "http://localhost:8000");
        assert!(frame.contains("[ Predicting… ]"));
        assert!(!frame.contains(IDLE_PROMPT));
    }

    #[test]
    fn test_success_frame_keeps_order() {
        let mut machine = InteractionStateMachine::default();
        machine.begin_submit();
        machine.complete_submit(Ok(versicolor()));

        let panel = render_outcome(&machine.snapshot());
        assert!(panel.contains("Most likely species: Versicolor"));
        let setosa = panel.find("Setosa").unwrap();
        let versicolor = panel.find("Versicolor ").unwrap();
        let virginica = panel.find("Virginica").unwrap();
        assert!(setosa < versicolor && versicolor < virginica);
        assert!(panel.contains("91.0%"));
        assert!(panel.contains("2.0%"));
    }

    #[test]
    fn test_error_frame() {
        let mut machine = InteractionStateMachine::default();
        machine.begin_submit();
        machine.complete_submit(Err(ClientError::HttpError { status_code: 500 }));
        assert_eq!(render_outcome(&machine.snapshot()), "Error: Request failed: 500\n");
    }

    #[test]
    fn test_draft_marker() {
        let mut machine = InteractionStateMachine::default();
        machine.on_field_change(FeatureField::SepalWidth, "abc");
        let inputs = render_inputs(&machine.snapshot());
        assert!(inputs.contains("abc  (not a number)"));
    }

    #[test]
    fn test_bar_floor() {
        assert_eq!(bar(3.0).chars().filter(|c| *c == '█').count(), 1);
        assert_eq!(bar(100.0).chars().filter(|c| *c == '█').count(), BAR_CELLS);
    }
}
