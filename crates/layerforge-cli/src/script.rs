//! Request scripts: a JSON array of editing and info requests replayed
//! against one model.
//!
//! Each entry is either a mutation (`moveVertex`, `createEdge`, ...) or an
//! info request (`getLayerInfo`, `validateEdge`, ...); both are tagged by
//! `"type"` and the wire names never overlap. Every entry yields one JSON
//! response: the [`ChangeOutcome`] for a mutation, the info response
//! otherwise.

use layerforge_model::{ChangeOutcome, ChangeRequest, InfoRequest, InfoResponse, Model};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptRequest {
    Change(ChangeRequest),
    Info(InfoRequest),
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScriptResponse {
    Change(ChangeOutcome),
    Info(InfoResponse),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Entry `index` is JSON but not a known request.
    #[error("request {index} is not a recognized request: {entry}")]
    UnknownRequest { index: usize, entry: String },
}

/// Parses a script. Every entry is checked before anything runs, so a bad
/// script leaves the model untouched.
pub fn parse_script(text: &str) -> Result<Vec<ScriptRequest>, ScriptError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(text)?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            ScriptRequest::deserialize(&entry).map_err(|_| ScriptError::UnknownRequest {
                index,
                entry: entry.to_string(),
            })
        })
        .collect()
}

/// Runs every request in order.
pub fn run_script(model: &mut Model, requests: &[ScriptRequest]) -> Vec<ScriptResponse> {
    requests
        .iter()
        .map(|request| match request {
            ScriptRequest::Change(change) => {
                debug!(request = change.name(), "applying change");
                ScriptResponse::Change(model.request_change(change))
            }
            ScriptRequest::Info(info) => ScriptResponse::Info(model.info(info)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerforge_model::ModelConfig;

    #[test]
    fn entries_are_sorted_into_changes_and_info() {
        let script = r#"[
            {"type": "createLayer", "newLayerId": "in", "layerType": "Input", "x": 0, "y": 0},
            {"type": "getLayerInfo", "layerId": "in"}
        ]"#;
        let requests = parse_script(script).unwrap();
        assert!(matches!(requests[0], ScriptRequest::Change(_)));
        assert!(matches!(requests[1], ScriptRequest::Info(_)));
    }

    #[test]
    fn unknown_entries_are_reported_by_position() {
        let script = r#"[{"type": "getListOfLayers"}, {"type": "explode"}]"#;
        match parse_script(script) {
            Err(ScriptError::UnknownRequest { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn responses_follow_requests() {
        let script = r#"[
            {"type": "createLayer", "newLayerId": "in", "layerType": "Input", "x": 0, "y": 0},
            {"type": "deleteEdge", "edgeId": "missing"},
            {"type": "getLayerInfo", "layerId": "in"}
        ]"#;
        let mut model = Model::with_config(ModelConfig::seeded(1));
        let responses = run_script(&mut model, &parse_script(script).unwrap());

        let json: Vec<serde_json::Value> = responses
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        assert_eq!(json[0]["outcome"], "applied");
        assert_eq!(json[1]["outcome"], "ignored");
        assert_eq!(json[2]["layerExists"], true);
    }
}
