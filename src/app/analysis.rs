//! Gateway session: analysis results, suggestions and the path viewer

use std::rc::Rc;
use std::time::Instant;

use crate::gateway::annotate::PathView;
use crate::gateway::{
    merge, Analysis, ColumnSuggestionRequest, EvaluationRequest, Evaluator, Gateway, GatewayError, SuggestedColumn,
    SuggestedValue, Suggester, ValueSuggestionRequest, Verdict, DEFAULT_COLUMN_COUNT, DEFAULT_VALUE_COUNT,
};
use crate::ui::components::MessageType;

use super::App;

/// Verdicts tried in order when opening a row's paths
const PATH_ORDER: [Verdict; 3] = [Verdict::Promising, Verdict::Yes, Verdict::No];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Columns,
    Values,
}

/// Cursor and marks over the pending suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub cursor: usize,
    marked: Vec<usize>,
}

impl Picker {
    pub fn new(kind: PickerKind) -> Self {
        Self {
            kind,
            cursor: 0,
            marked: Vec::new(),
        }
    }

    pub fn is_marked(&self, idx: usize) -> bool {
        self.marked.contains(&idx)
    }

    fn toggle(&mut self) {
        match self.marked.iter().position(|&i| i == self.cursor) {
            Some(pos) => {
                self.marked.remove(pos);
            }
            None => self.marked.push(self.cursor),
        }
    }

    /// Marked entries, or the one under the cursor when nothing is marked
    pub fn chosen(&self) -> Vec<usize> {
        if self.marked.is_empty() {
            return vec![self.cursor];
        }
        let mut chosen = self.marked.clone();
        chosen.sort_unstable();
        chosen
    }
}

#[derive(Debug, Default)]
pub struct AnalysisState {
    pub analysis: Option<Analysis>,
    pub columns: Vec<SuggestedColumn>,
    pub values: Vec<SuggestedValue>,
    /// Column the value suggestions were requested for
    pub value_column: Option<String>,
    pub paths: Option<PathView>,
    pub picker: Option<Picker>,
}

impl AnalysisState {
    pub fn results(&self) -> &[crate::gateway::Evaluation] {
        self.analysis.as_ref().map(|a| a.results.as_slice()).unwrap_or_default()
    }

    /// Whether a popup is taking the keys
    pub fn has_overlay(&self) -> bool {
        self.paths.is_some() || self.picker.is_some()
    }

    pub fn next_path(&mut self) {
        if let Some(view) = self.paths.as_mut() {
            view.next();
        }
    }

    pub fn prev_path(&mut self) {
        if let Some(view) = self.paths.as_mut() {
            view.prev();
        }
    }

    pub fn close_paths(&mut self) {
        self.paths = None;
    }

    fn suggestion_count(&self, kind: PickerKind) -> usize {
        match kind {
            PickerKind::Columns => self.columns.len(),
            PickerKind::Values => self.values.len(),
        }
    }

    pub fn picker_down(&mut self) {
        let Some(kind) = self.picker.as_ref().map(|p| p.kind) else {
            return;
        };
        let len = self.suggestion_count(kind);
        if let Some(picker) = self.picker.as_mut() {
            if picker.cursor + 1 < len {
                picker.cursor += 1;
            }
        }
    }

    pub fn picker_up(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.cursor = picker.cursor.saturating_sub(1);
        }
    }

    pub fn picker_toggle(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.toggle();
        }
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }
}

/// Remove the entries at `indices` from `items`, keeping their order
fn take_selected<T>(items: &mut Vec<T>, indices: &[usize]) -> Vec<T> {
    let mut taken = Vec::new();
    let mut kept = Vec::new();
    for (i, item) in items.drain(..).enumerate() {
        if indices.contains(&i) {
            taken.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    taken
}

impl App {
    /// Use `gateway` for analysis and suggestions
    pub fn with_gateway(mut self, gateway: Rc<dyn Gateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    fn require_gateway(&mut self, now: Instant) -> Option<Rc<dyn Gateway>> {
        let gateway = self.gateway.clone();
        if gateway.is_none() {
            self.set_message("No gateway configured, add [gateway] to config.toml", MessageType::Warning, now);
        }
        gateway
    }

    /// Evaluate the grid with the configured gateway
    pub fn analyze(&mut self, now: Instant) -> bool {
        let Some(gateway) = self.require_gateway(now) else {
            return false;
        };
        self.run_analysis(&*gateway, now)
    }

    /// Ask the configured gateway for new columns and open the picker
    pub fn suggest_columns(&mut self, now: Instant) -> bool {
        let Some(gateway) = self.require_gateway(now) else {
            return false;
        };
        self.request_columns(&*gateway, DEFAULT_COLUMN_COUNT, now) && self.open_picker(PickerKind::Columns, now)
    }

    /// Ask the configured gateway for values of the selected column
    pub fn suggest_values(&mut self, now: Instant) -> bool {
        let Some(gateway) = self.require_gateway(now) else {
            return false;
        };
        let col = self.editor.selection().col;
        self.request_values(&*gateway, col, DEFAULT_VALUE_COUNT, now) && self.open_picker(PickerKind::Values, now)
    }

    /// Evaluate every combination of the current grid
    pub fn run_analysis<E: Evaluator + ?Sized>(&mut self, evaluator: &E, now: Instant) -> bool {
        let total = self.grid().combination_count();
        if total == 0 {
            self.set_message("Add values before analyzing", MessageType::Warning, now);
            return false;
        }

        tracing::info!(combinations = total, "analysis requested");
        let request = EvaluationRequest::from_grid(self.grid());
        match evaluator.evaluate(&request) {
            Ok(analysis) => {
                let summary = analysis.summary;
                self.set_message(
                    &format!(
                        "Analyzed {} combinations: {} yes, {} promising, {} no",
                        analysis.total_combinations, summary.yes, summary.promising, summary.no
                    ),
                    MessageType::Success,
                    now,
                );
                self.analysis.paths = None;
                self.analysis.analysis = Some(analysis);
                true
            }
            Err(e) => {
                self.report_error("Analysis failed", &e, now);
                false
            }
        }
    }

    pub fn request_columns<S: Suggester + ?Sized>(&mut self, suggester: &S, count: usize, now: Instant) -> bool {
        let request = ColumnSuggestionRequest::from_grid(self.grid()).with_count(count);
        match suggester.suggest_columns(&request) {
            Ok(columns) => {
                tracing::info!(count = columns.len(), "column suggestions received");
                self.analysis.columns = columns;
                true
            }
            Err(e) => {
                self.report_error("Column suggestions failed", &e, now);
                false
            }
        }
    }

    pub fn request_values<S: Suggester + ?Sized>(
        &mut self,
        suggester: &S,
        col: usize,
        count: usize,
        now: Instant,
    ) -> bool {
        let request = match ValueSuggestionRequest::from_grid(self.grid(), col) {
            Ok(request) => request.with_count(count),
            Err(e) => {
                self.report_error("Value suggestions failed", &e, now);
                return false;
            }
        };

        match suggester.suggest_values(&request) {
            Ok(values) => {
                tracing::info!(count = values.len(), column = %request.target_column, "value suggestions received");
                self.analysis.values = values;
                self.analysis.value_column = Some(request.target_column);
                true
            }
            Err(e) => {
                self.report_error("Value suggestions failed", &e, now);
                false
            }
        }
    }

    fn open_picker(&mut self, kind: PickerKind, now: Instant) -> bool {
        self.analysis.paths = None;
        if self.analysis.suggestion_count(kind) == 0 {
            self.analysis.picker = None;
            self.set_message("No suggestions returned", MessageType::Info, now);
            return false;
        }
        self.analysis.picker = Some(Picker::new(kind));
        true
    }

    /// Merge the picked suggestions, or all of them, as one undo step
    pub fn accept_picked(&mut self, all: bool, now: Instant) -> bool {
        let Some(picker) = self.analysis.picker.clone() else {
            return false;
        };
        let indices: Vec<usize> = if all {
            (0..self.analysis.suggestion_count(picker.kind)).collect()
        } else {
            picker.chosen()
        };

        let merged = match picker.kind {
            PickerKind::Columns => self.accept_columns(&indices, now),
            PickerKind::Values => self.accept_values(&indices, now),
        };
        if merged {
            self.set_message(&format!("Added {} suggestion(s)", indices.len()), MessageType::Success, now);
        }

        let remaining = self.analysis.suggestion_count(picker.kind);
        self.analysis.picker = (remaining > 0).then(|| Picker {
            kind: picker.kind,
            cursor: picker.cursor.min(remaining - 1),
            marked: Vec::new(),
        });
        merged
    }

    /// Merge the suggested columns at `indices` as one undo step
    pub fn accept_columns(&mut self, indices: &[usize], now: Instant) -> bool {
        let accepted = take_selected(&mut self.analysis.columns, indices);
        let merged = self.editor.apply(|grid| merge::accept_columns(grid, &accepted));
        self.sync_autosave(now);
        merged
    }

    /// Merge the suggested values at `indices` into their column as one
    /// undo step. The column is found by name since it may have moved.
    pub fn accept_values(&mut self, indices: &[usize], now: Instant) -> bool {
        let name = self.analysis.value_column.clone().unwrap_or_default();
        let Some(col) = self.grid().column_index(&name) else {
            self.report_error("Cannot add values", &GatewayError::UnknownColumn(name), now);
            return false;
        };

        let accepted = take_selected(&mut self.analysis.values, indices);
        let merged = self.editor.apply(|grid| merge::accept_values(grid, col, &accepted));
        self.sync_autosave(now);
        merged
    }

    /// Open the path viewer on the selected row, best verdict first
    pub fn open_row_paths(&mut self, now: Instant) -> bool {
        if self.analysis.results().is_empty() {
            self.set_message("No analysis yet, press E to run one", MessageType::Info, now);
            return false;
        }
        let row = self.editor.selection().row;
        if row < 0 {
            self.set_message("Select a row to see its paths", MessageType::Info, now);
            return false;
        }

        for verdict in PATH_ORDER {
            if let Some(view) = PathView::open(self.editor.grid(), self.analysis.results(), row as usize, verdict) {
                self.analysis.picker = None;
                self.analysis.paths = Some(view);
                return true;
            }
        }
        self.set_message("No paths end in this row", MessageType::Info, now);
        false
    }

    /// Switch the open viewer to the next verdict the row has paths for
    pub fn cycle_path_verdict(&mut self) -> bool {
        let Some(current) = self.analysis.paths.as_ref().map(|view| view.current().verdict) else {
            return false;
        };
        let row = self.editor.selection().row;
        if row < 0 {
            return false;
        }

        let start = PATH_ORDER.iter().position(|v| *v == current).unwrap_or(0);
        for step in 1..PATH_ORDER.len() {
            let verdict = PATH_ORDER[(start + step) % PATH_ORDER.len()];
            if let Some(view) = PathView::open(self.editor.grid(), self.analysis.results(), row as usize, verdict) {
                self.analysis.paths = Some(view);
                return true;
            }
        }
        false
    }
}
