//! Gateway Module
//!
//! Boundaries to the combination evaluator and the suggestion service, plus
//! the read-only projections and merges built on their results.

pub mod annotate;
pub mod command;
pub mod merge;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Combination, Grid};

pub use command::CommandGateway;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Service unavailable")]
    Unavailable,

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub const DEFAULT_COLUMN_COUNT: usize = 3;
pub const DEFAULT_VALUE_COUNT: usize = 5;

/// Evaluator verdict for one combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
    Promising,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Promising => "promising",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub combination: Combination,
    pub verdict: Verdict,
    pub reasoning: String,
}

/// Per-verdict counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictSummary {
    pub yes: usize,
    pub no: usize,
    pub promising: usize,
}

impl VerdictSummary {
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Yes => self.yes += 1,
            Verdict::No => self.no += 1,
            Verdict::Promising => self.promising += 1,
        }
    }

    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Yes => self.yes,
            Verdict::No => self.no,
            Verdict::Promising => self.promising,
        }
    }

    pub fn total(&self) -> usize {
        self.yes + self.no + self.promising
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub results: Vec<Evaluation>,
    pub total_combinations: usize,
    pub summary: VerdictSummary,
}

impl Analysis {
    /// Build an analysis whose summary is tallied from `results`
    pub fn from_results(results: Vec<Evaluation>, total_combinations: usize) -> Self {
        let summary = annotate::tally(&results);
        Self {
            results,
            total_combinations,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub problem: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EvaluationRequest {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            problem: grid.problem().to_string(),
            columns: grid.columns().to_vec(),
            rows: grid.rows().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSuggestionRequest {
    pub problem: String,
    pub existing_columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    pub count: usize,
}

impl ColumnSuggestionRequest {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            problem: grid.problem().to_string(),
            existing_columns: grid.columns().to_vec(),
            rows: grid.rows().to_vec(),
            additional_context: None,
            count: DEFAULT_COLUMN_COUNT,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSuggestionRequest {
    pub problem: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub target_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    pub count: usize,
}

impl ValueSuggestionRequest {
    /// Request values for the column at `col`
    pub fn from_grid(grid: &Grid, col: usize) -> GatewayResult<Self> {
        let target_column = grid
            .columns()
            .get(col)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownColumn(format!("#{}", col + 1)))?;

        Ok(Self {
            problem: grid.problem().to_string(),
            columns: grid.columns().to_vec(),
            rows: grid.rows().to_vec(),
            target_column,
            additional_context: None,
            count: DEFAULT_VALUE_COUNT,
        })
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedColumn {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub suggested_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedValue {
    pub value: String,
    #[serde(default)]
    pub rationale: String,
}

/// Judges every combination of a grid against its problem statement
pub trait Evaluator {
    fn evaluate(&self, request: &EvaluationRequest) -> GatewayResult<Analysis>;
}

/// Proposes new parameters and new values for existing ones
pub trait Suggester {
    fn suggest_columns(&self, request: &ColumnSuggestionRequest) -> GatewayResult<Vec<SuggestedColumn>>;

    fn suggest_values(&self, request: &ValueSuggestionRequest) -> GatewayResult<Vec<SuggestedValue>>;
}

/// One service answering both evaluation and suggestion requests
pub trait Gateway: Evaluator + Suggester {}

impl<T: Evaluator + Suggester> Gateway for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_wire_format() {
        let json = serde_json::to_string(&Verdict::Promising).unwrap();
        assert_eq!(json, "\"promising\"");
        assert!(serde_json::from_str::<Verdict>("\"maybe\"").is_err());
    }

    #[test]
    fn test_analysis_wire_format() {
        let json = r#"{
            "results": [
                {"combination": {"Mode": "Bike", "Power": "Solar"}, "verdict": "yes", "reasoning": "ok"}
            ],
            "totalCombinations": 4,
            "summary": {"yes": 1, "no": 0, "promising": 0}
        }"#;
        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.total_combinations, 4);
        assert_eq!(analysis.results[0].combination["Mode"], "Bike");
        assert_eq!(analysis.summary.total(), 1);
    }

    #[test]
    fn test_suggested_column_wire_format() {
        let json = r#"{"name": "Storage", "description": "Where it lives", "suggestedValues": ["Shed", "Rack"]}"#;
        let column: SuggestedColumn = serde_json::from_str(json).unwrap();
        assert_eq!(column.suggested_values, vec!["Shed", "Rack"]);
    }

    #[test]
    fn test_request_defaults() {
        let grid = Grid::new();
        let columns = ColumnSuggestionRequest::from_grid(&grid);
        assert_eq!(columns.count, 3);
        assert_eq!(columns.existing_columns, grid.columns());

        let values = ValueSuggestionRequest::from_grid(&grid, 1).unwrap().with_count(2);
        assert_eq!(values.target_column, "Parameter 2");
        assert_eq!(values.count, 2);

        let err = ValueSuggestionRequest::from_grid(&grid, 5).unwrap_err();
        assert!(matches!(err, GatewayError::UnknownColumn(_)));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = ColumnSuggestionRequest::from_grid(&Grid::new()).with_context("urban");
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("existingColumns").is_some());
        assert_eq!(value["additionalContext"], "urban");
    }
}
