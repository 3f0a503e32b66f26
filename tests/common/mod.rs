//! Shared fixtures: a scripted generator and valid model responses.
#![allow(dead_code)]

use async_trait::async_trait;
use decksmith::{GenerationRequest, GenerationSettings, Pipeline, StructuredGenerator, UpstreamError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, UpstreamError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        })
    }

    pub fn ok(responses: Vec<String>) -> Arc<Self> {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    /// Every call sleeps for `delay` before answering.
    pub fn slow(responses: Vec<String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl StructuredGenerator for ScriptedGenerator {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::new("script exhausted")))
    }
}

pub fn pipeline(large: Arc<ScriptedGenerator>, small: Arc<ScriptedGenerator>) -> Pipeline {
    Pipeline::new(large, small, GenerationSettings::default())
}

pub const TITLES: [&str; 5] = ["Introduction", "Tidal Forces", "Daily Cycle", "Coastal Impact", "Conclusion"];

pub fn outline_json(titles: &[&str]) -> String {
    let slides: Vec<Value> = titles
        .iter()
        .map(|t| json!({"title": t, "body": "- the moon pulls the oceans\n- **2** tides per day"}))
        .collect();
    json!({
        "title": "Understanding Tides",
        "notes": ["Use ocean imagery throughout the presentation"],
        "slides": slides
    })
    .to_string()
}

pub fn structure_json(tags: &[i64]) -> String {
    json!({ "slides": tags }).to_string()
}

pub fn body_text() -> String {
    "The moon's gravity raises **two** bulges of water on Earth. ".repeat(3)
}

pub fn items(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"heading": format!("Point {i}"), "description": "Short and clear"}))
            .collect(),
    )
}

pub fn graph(name: &str) -> Value {
    json!({
        "name": name,
        "type": "bar",
        "unit": "m",
        "data": {"categories": ["Bay of Fundy", "Bristol Channel"], "series": [{"name": "range", "data": [16, 15]}]}
    })
}

/// A valid loose slide of the given type.
pub fn slide(tag: u8, title: &str) -> Value {
    let content = match tag {
        1 => json!({"title": title, "body": body_text(), "image_prompt": "ocean at dusk, no text"}),
        2 => json!({"title": title, "body": items(3)}),
        4 => json!({"title": title, "body": [
            {"heading": "High tide", "description": "Water at its peak", "image_prompt": "flooded pier, no text"}
        ]}),
        5 => json!({"title": title, "body": body_text(), "graph": graph(title)}),
        6 => json!({"title": title, "description": "How the cycle repeats", "body": items(2)}),
        7 => json!({"title": title, "body": [
            {"heading": "Moon", "description": "Main driver", "icon_queries": ["full moon", "moon", "night"]}
        ]}),
        8 => json!({"title": title, "description": "Who feels the tide", "body": [
            {"heading": "Harbors", "description": "Ships wait for water", "icon_queries": ["harbor", "port", "ship"]}
        ]}),
        9 => json!({"title": title, "body": items(1), "graph": graph(title)}),
        other => panic!("no fixture for type {other}"),
    };
    json!({"type": tag, "content": content})
}

pub fn deck_json(tags: &[u8]) -> String {
    let slides: Vec<Value> = tags
        .iter()
        .zip(TITLES.iter().cycle())
        .map(|(tag, title)| slide(*tag, title))
        .collect();
    json!({ "slides": slides }).to_string()
}
