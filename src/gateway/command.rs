//! Gateway backed by an external command
//!
//! Each call spawns the configured program, writes one JSON envelope
//! `{"operation": .., "request": ..}` to its stdin and reads one JSON
//! document from its stdout. A non-zero exit rejects the request with the
//! program's stderr as the reason.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    Analysis, ColumnSuggestionRequest, EvaluationRequest, Evaluator, GatewayError, GatewayResult,
    SuggestedColumn, SuggestedValue, Suggester, ValueSuggestionRequest,
};

pub const OP_EVALUATE: &str = "evaluate";
pub const OP_SUGGEST_COLUMNS: &str = "suggest_columns";
pub const OP_SUGGEST_VALUES: &str = "suggest_values";

/// `[gateway]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGateway {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    operation: &'a str,
    request: &'a T,
}

#[derive(Deserialize)]
struct ColumnsResponse {
    #[serde(default)]
    columns: Vec<SuggestedColumn>,
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<SuggestedValue>,
}

impl CommandGateway {
    fn call<Req, Resp>(&self, operation: &str, request: &Req) -> GatewayResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(&Envelope { operation, request })
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                tracing::warn!(program = %self.program, error = %e, "gateway command did not start");
                GatewayError::Unavailable
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A program that answers without reading closes the pipe early
            if let Err(e) = stdin.write_all(&payload) {
                if e.kind() != ErrorKind::BrokenPipe {
                    tracing::warn!(program = %self.program, error = %e, "failed to send gateway request");
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| {
            tracing::warn!(program = %self.program, error = %e, "gateway command failed");
            GatewayError::Unavailable
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            tracing::warn!(operation, %reason, "gateway rejected request");
            return Err(GatewayError::Rejected(reason));
        }

        tracing::debug!(operation, bytes = output.stdout.len(), "gateway responded");
        serde_json::from_slice(&output.stdout).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

impl Evaluator for CommandGateway {
    fn evaluate(&self, request: &EvaluationRequest) -> GatewayResult<Analysis> {
        self.call(OP_EVALUATE, request)
    }
}

impl Suggester for CommandGateway {
    fn suggest_columns(&self, request: &ColumnSuggestionRequest) -> GatewayResult<Vec<SuggestedColumn>> {
        let response: ColumnsResponse = self.call(OP_SUGGEST_COLUMNS, request)?;
        Ok(response.columns)
    }

    fn suggest_values(&self, request: &ValueSuggestionRequest) -> GatewayResult<Vec<SuggestedValue>> {
        let response: ValuesResponse = self.call(OP_SUGGEST_VALUES, request)?;
        Ok(response.values)
    }
}
