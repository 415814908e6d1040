use std::io::{self, BufRead, Write};

use parking_lot::Mutex;
use prospect_core::{EngineConfig, ProfileStore, ProspectError, ScoreResult, Tier};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::framing::{read_frame, write_frame, Incoming};
use crate::params::{required_number, required_str, ParamError};
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_REQUEST, METHOD_NOT_FOUND,
};

/// JSON-RPC front for a single [`ProfileStore`].
///
/// All requests go through one lock, so a weight edit's
/// read-merge-normalize-write never interleaves with another edit.
pub struct ProspectServer {
    store: Mutex<ProfileStore>,
}

impl ProspectServer {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, ProspectError> {
        Ok(Self::new(ProfileStore::with_defaults(config)?))
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        let is_notification = request.id.is_none();
        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "handling request");

        let response = match request.method.as_str() {
            "ping" => JsonRpcResponse::success(id, json!({})),
            "prospect/describe" => JsonRpcResponse::success(id, self.describe()),
            "prospect/score" => self.respond(id, |store| score_json(store.current_score())),
            "prospect/snapshot" => {
                self.respond(id, |store| Ok(serde_json::to_value(store.snapshot())?))
            }
            "prospect/setAttribute" => {
                let params = request.params;
                self.respond(id, move |store| {
                    let dimension = required_str(&params, "dimension")?;
                    let value = required_number(&params, "value")?;
                    score_json(store.set_attribute(dimension, value)?)
                })
            }
            "prospect/setWeight" => {
                let params = request.params;
                self.respond(id, move |store| {
                    let dimension = required_str(&params, "dimension")?;
                    let value = required_number(&params, "value")?;
                    let score = score_json(store.set_weight(dimension, value)?)?;
                    let weights = serde_json::to_value(store.weight_shares())?;
                    Ok(json!({"score": score, "weights": weights}))
                })
            }
            "prospect/setName" => {
                let params = request.params;
                self.respond(id, move |store| {
                    let name = required_str(&params, "name")?;
                    store.set_profile_name(name);
                    Ok(json!({"name": store.name()}))
                })
            }
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found"),
        };

        if is_notification {
            None
        } else {
            Some(response)
        }
    }

    fn respond(
        &self,
        id: Value,
        op: impl FnOnce(&mut ProfileStore) -> Result<Value, RequestError>,
    ) -> JsonRpcResponse {
        let mut store = self.store.lock();
        match op(&mut *store) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err @ RequestError::Encode(_)) => {
                warn!(error = %err, "failed to encode response");
                JsonRpcResponse::error(id, INTERNAL_ERROR, err.to_string())
            }
            Err(err) => {
                debug!(error = %err, "request rejected");
                JsonRpcResponse::invalid_params(id, err.to_string())
            }
        }
    }

    fn describe(&self) -> Value {
        let store = self.store.lock();
        let dimensions: Vec<Value> = store
            .reference()
            .iter()
            .map(|(dim, mean)| json!({"key": dim.key, "label": dim.label, "reference": mean}))
            .collect();
        let tiers: Vec<Value> = Tier::DESCENDING
            .into_iter()
            .map(|tier| json!({"tier": tier.label(), "min_percentage": tier.min_percentage()}))
            .collect();
        json!({
            "dimensions": dimensions,
            "sigma": store.sigma(),
            "range_policy": store.range_policy().label(),
            "tiers": tiers,
        })
    }

    pub fn serve_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut reader = io::BufReader::new(stdin.lock());
        let mut stdout = io::stdout();
        info!("prospectd serving on stdio");
        self.serve(&mut reader, &mut stdout)
    }

    /// Answers requests until end of input.
    pub fn serve<R: BufRead, W: Write>(&self, reader: &mut R, writer: &mut W) -> io::Result<()> {
        while let Some(incoming) = read_frame(reader)? {
            let (body, frame) = match incoming {
                Incoming::Payload { body, frame } => (body, frame),
                Incoming::Malformed { reason, frame } => {
                    warn!(%reason, "dropping malformed frame");
                    write_frame(writer, &JsonRpcResponse::parse_error(reason), frame)?;
                    continue;
                }
            };

            match serde_json::from_slice::<JsonRpcRequest>(&body) {
                Ok(request) => {
                    if let Some(response) = self.handle_request(request) {
                        write_frame(writer, &response, frame)?;
                    }
                }
                Err(err) => {
                    let response = JsonRpcResponse::parse_error(format!("parse error: {err}"));
                    write_frame(writer, &response, frame)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error(transparent)]
    Prospect(#[from] ProspectError),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

fn score_json(score: &ScoreResult) -> Result<Value, RequestError> {
    let breakdown = serde_json::to_value(&score.breakdown)?;
    Ok(json!({
        "percentage": score.percentage,
        "tier": score.tier.label(),
        "tier_id": score.tier,
        "probability": score.probability,
        "breakdown": breakdown,
    }))
}
