//! Helpers shared by the unit tests.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::graph::{FeedClient, PostId, PostRequest};

/// Records every request; fails for the listed groups.
#[derive(Default)]
pub struct StubClient {
    calls: Mutex<Vec<PostRequest>>,
    failing: HashSet<String>,
}

impl StubClient {
    pub fn failing(groups: &[&str]) -> Self {
        Self {
            failing: groups.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<PostRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl FeedClient for StubClient {
    fn create_feed_post(
        &self,
        request: &PostRequest,
    ) -> impl Future<Output = Result<PostId, ApiError>> + Send {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };
        let result = if self.failing.contains(&request.group_id) {
            Err(ApiError::Graph {
                status: StatusCode::FORBIDDEN,
                message: "nope".into(),
                kind: None,
                code: Some(200),
                payload: serde_json::Value::Null,
            })
        } else {
            Ok(PostId::new(format!("{}_{n}", request.group_id)))
        };
        async move { result }
    }
}

pub fn groups(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|g| g.to_string()).collect()
}
