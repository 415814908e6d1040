use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use prospect_core::{EngineConfig, WEIGHT_SUM_TOLERANCE};
use prospect_rpc::framing::MAX_FRAME_BYTES;
use prospect_rpc::protocol::{
    JsonRpcRequest, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use prospect_rpc::ProspectServer;
use serde_json::{json, Value};

fn server() -> ProspectServer {
    ProspectServer::from_config(&EngineConfig::default()).expect("server")
}

fn call(server: &ProspectServer, id: u64, method: &str, params: Value) -> Value {
    server
        .handle_request(JsonRpcRequest::new(id, method, params))
        .expect("response")
        .result
        .expect("result")
}

fn call_err(server: &ProspectServer, id: u64, method: &str, params: Value) -> i64 {
    server
        .handle_request(JsonRpcRequest::new(id, method, params))
        .expect("response")
        .error
        .expect("error")
        .code
}

fn weight_sum(snapshot: &Value) -> f64 {
    snapshot["weights"]
        .as_array()
        .expect("weights array")
        .iter()
        .map(|w| w["value"].as_f64().expect("weight value"))
        .sum()
}

#[test]
fn default_score_is_elite() {
    let server = server();
    let score = call(&server, 1, "prospect/score", json!({}));
    assert_eq!(score["percentage"], json!(95));
    assert_eq!(score["tier"], json!("Elite"));
    assert_eq!(score["tier_id"], json!("elite"));
    assert_eq!(score["breakdown"].as_array().map(Vec::len), Some(4));
}

#[test]
fn describe_lists_dimensions_and_tiers() {
    let server = server();
    let out = call(&server, 1, "prospect/describe", json!({}));
    let keys: Vec<&str> = out["dimensions"]
        .as_array()
        .expect("dimensions")
        .iter()
        .filter_map(|d| d["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["shooting", "defense", "hustle", "teamFit"]);
    assert_eq!(out["sigma"], json!(15.0));
    assert_eq!(out["range_policy"], json!("passthrough"));
    assert_eq!(out["tiers"][0]["min_percentage"], json!(80));
}

#[test]
fn numeric_text_is_coerced_and_garbage_rejected() {
    let server = server();
    let edited = call(
        &server,
        1,
        "prospect/setAttribute",
        json!({"dimension": "shooting", "value": "40"}),
    );
    assert!(edited["percentage"].as_u64().expect("percentage") < 95);

    let code = call_err(
        &server,
        2,
        "prospect/setAttribute",
        json!({"dimension": "shooting", "value": "forty"}),
    );
    assert_eq!(code, INVALID_PARAMS);

    let snapshot = call(&server, 3, "prospect/snapshot", json!({}));
    assert_eq!(snapshot["attributes"][0]["prospect"], json!(40.0));
    assert_eq!(snapshot["score"]["percentage"], edited["percentage"]);
}

#[test]
fn unknown_dimension_is_invalid_params() {
    let server = server();
    let code = call_err(
        &server,
        1,
        "prospect/setWeight",
        json!({"dimension": "passing", "value": 0.3}),
    );
    assert_eq!(code, INVALID_PARAMS);
    let code = call_err(&server, 2, "prospect/setWeight", json!({"value": 0.3}));
    assert_eq!(code, INVALID_PARAMS);
}

#[test]
fn weight_edits_return_normalized_shares() {
    let server = server();
    let out = call(
        &server,
        1,
        "prospect/setWeight",
        json!({"dimension": "defense", "value": 0.8}),
    );
    assert!((weight_sum(&out) - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    assert!(out["score"]["percentage"].as_u64().is_some());
}

#[test]
fn negative_weight_is_invalid_params() {
    let server = server();
    let before = call(&server, 1, "prospect/snapshot", json!({}));
    let code = call_err(
        &server,
        2,
        "prospect/setWeight",
        json!({"dimension": "shooting", "value": -0.5}),
    );
    assert_eq!(code, INVALID_PARAMS);

    let after = call(&server, 3, "prospect/snapshot", json!({}));
    assert_eq!(after, before);
    for w in after["weights"].as_array().expect("weights") {
        let value = w["value"].as_f64().expect("weight value");
        assert!((0.0..=1.0).contains(&value));
    }
}

#[test]
fn zeroing_every_weight_keeps_raw_vector() {
    let server = server();
    for (i, key) in ["shooting", "defense", "hustle", "teamFit"].iter().enumerate() {
        call(
            &server,
            i as u64,
            "prospect/setWeight",
            json!({"dimension": key, "value": 0}),
        );
    }
    let snapshot = call(&server, 10, "prospect/snapshot", json!({}));
    assert_eq!(weight_sum(&snapshot), 0.0);
    assert_eq!(snapshot["summary"]["percentage"], json!(0));
    assert_eq!(snapshot["summary"]["label"], json!("Development project"));
}

#[test]
fn set_name_does_not_change_score() {
    let server = server();
    let before = call(&server, 1, "prospect/score", json!({}));
    let out = call(&server, 2, "prospect/setName", json!({"name": "Glue Guy"}));
    assert_eq!(out["name"], json!("Glue Guy"));
    assert_eq!(call(&server, 3, "prospect/score", json!({})), before);
    assert_eq!(call(&server, 4, "prospect/snapshot", json!({}))["name"], json!("Glue Guy"));
}

#[test]
fn protocol_errors() {
    let server = server();
    assert_eq!(call_err(&server, 1, "prospect/rank", json!({})), METHOD_NOT_FOUND);

    let mut req = JsonRpcRequest::new(2, "ping", json!({}));
    req.jsonrpc = "1.0".to_string();
    let resp = server.handle_request(req).expect("response");
    assert_eq!(resp.error.expect("error").code, INVALID_REQUEST);
}

#[test]
fn notifications_apply_without_response() {
    let server = server();
    let mut req = JsonRpcRequest::new(
        0,
        "prospect/setAttribute",
        json!({"dimension": "defense", "value": 80}),
    );
    req.id = None;
    assert!(server.handle_request(req).is_none());

    let score = call(&server, 1, "prospect/score", json!({}));
    let defense = &score["breakdown"][1];
    assert_eq!(defense["value"], json!(80.0));
    assert_eq!(defense["likelihood"], json!(1.0));
}

#[test]
fn concurrent_weight_edits_keep_invariant() {
    let server = Arc::new(server());
    let keys = ["shooting", "defense", "hustle", "teamFit"];

    let handles: Vec<_> = (0..8_u64)
        .map(|t| {
            let server = Arc::clone(&server);
            thread::spawn(move || {
                for step in 0..50_u64 {
                    let key = keys[((t + step) % 4) as usize];
                    let value = ((t * 7 + step * 3) % 10) as f64 / 10.0 + 0.01;
                    call(
                        &server,
                        t * 1000 + step,
                        "prospect/setWeight",
                        json!({"dimension": key, "value": value}),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let snapshot = call(&server, 99_999, "prospect/snapshot", json!({}));
    assert!((weight_sum(&snapshot) - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
}

#[test]
fn serve_answers_in_request_framing() {
    let server = server();
    let framed = serde_json::to_vec(&json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prospect/score"
    }))
    .expect("body");

    let mut input = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(format!("Content-Length: {}\r\n\r\n", framed.len()).as_bytes());
    input.extend_from_slice(&framed);
    input.extend_from_slice(b"\nnot json\n");

    let mut reader = Cursor::new(input);
    let mut output = Vec::new();
    server.serve(&mut reader, &mut output).expect("serve");
    let text = String::from_utf8(output).expect("utf8");

    let (first_line, rest) = text.split_once('\n').expect("ping line");
    let first: Value = serde_json::from_str(first_line).expect("ping json");
    assert_eq!(first["id"], json!(1));
    assert_eq!(first["result"], json!({}));

    let (header, rest) = rest.split_once("\r\n\r\n").expect("frame header");
    let length: usize = header
        .strip_prefix("Content-Length: ")
        .and_then(|v| v.parse().ok())
        .expect("content length");
    let (body, error_line) = rest.split_at(length);
    let second: Value = serde_json::from_str(body).expect("framed json");
    assert_eq!(second["id"], json!(2));
    assert_eq!(second["result"]["percentage"], json!(95));

    let parse_error: Value = serde_json::from_str(error_line.trim()).expect("parse error json");
    assert_eq!(parse_error["error"]["code"], json!(-32700));
}

fn serve_bytes(server: &ProspectServer, input: Vec<u8>) -> String {
    let mut reader = Cursor::new(input);
    let mut output = Vec::new();
    server.serve(&mut reader, &mut output).expect("serve");
    String::from_utf8(output).expect("utf8")
}

fn framed_body(text: &str) -> Value {
    let (_, body) = text.split_once("\r\n\r\n").expect("frame header");
    serde_json::from_str(body).expect("framed json")
}

#[test]
fn absurd_content_length_is_a_parse_error() {
    let server = server();
    let text = serve_bytes(
        &server,
        b"Content-Length: 18446744073709551615\r\n\r\n{}".to_vec(),
    );
    assert_eq!(framed_body(&text)["error"]["code"], json!(PARSE_ERROR));
}

#[test]
fn oversized_frame_is_skipped_and_serving_continues() {
    let server = server();
    let mut input = format!("Content-Length: {}\r\n\r\n", MAX_FRAME_BYTES + 1).into_bytes();
    input.resize(input.len() + MAX_FRAME_BYTES + 1, b' ');
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"prospect/score\"}\n");

    let text = serve_bytes(&server, input);
    let (header, rest) = text.split_once("\r\n\r\n").expect("frame header");
    let length: usize = header
        .strip_prefix("Content-Length: ")
        .and_then(|v| v.parse().ok())
        .expect("content length");
    let (rejection, next_line) = rest.split_at(length);

    let rejection: Value = serde_json::from_str(rejection).expect("rejection json");
    assert_eq!(rejection["error"]["code"], json!(PARSE_ERROR));
    let next: Value = serde_json::from_str(next_line.trim()).expect("score json");
    assert_eq!(next["id"], json!(5));
    assert_eq!(next["result"]["percentage"], json!(95));
}
