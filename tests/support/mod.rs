#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vogon_client::api::{HttpBackend, JobKind, JobStatus, JobStatusSource};
use vogon_client::auth::TokenSet;
use vogon_client::error::{Result, VogonError};
use wiremock::MockServer;

/// One scripted answer of [`ScriptedSource`].
#[derive(Debug, Clone)]
pub enum Answer {
    Status(&'static str),
    Fail,
}

/// Status source answering from a fixed script. The last answer repeats once
/// the script runs out.
pub struct ScriptedSource {
    script: Vec<Answer>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
    seen: Mutex<Vec<(String, JobKind)>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Answer>) -> Arc<Self> {
        Arc::new(Self::build(script, Duration::ZERO))
    }

    pub fn always(text: &'static str) -> Arc<Self> {
        Self::new(vec![Answer::Status(text)])
    }

    /// Every request takes `latency` to answer.
    pub fn slow(script: Vec<Answer>, latency: Duration) -> Arc<Self> {
        Arc::new(Self::build(script, latency))
    }

    fn build(script: Vec<Answer>, latency: Duration) -> Self {
        assert!(!script.is_empty(), "script needs at least one answer");
        Self {
            script,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were outstanding at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, kind: JobKind) -> usize {
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .iter()
            .filter(|(_, seen_kind)| *seen_kind == kind)
            .count()
    }

    pub fn projects_seen(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .iter()
            .map(|(project, _)| project.clone())
            .collect()
    }
}

#[async_trait]
impl JobStatusSource for ScriptedSource {
    async fn job_status(&self, project_id: &str, kind: JobKind) -> Result<JobStatus> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .push((project_id.to_string(), kind));
        let outstanding = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(outstanding, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let answer = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .expect("script is non-empty");
        match answer {
            Answer::Status(text) => Ok(JobStatus::new(text)),
            Answer::Fail => Err(VogonError::api(503, "backend unavailable")),
        }
    }
}

pub fn tokens(access: &str, refresh: &str) -> TokenSet {
    TokenSet {
        access_token: Some(access.to_string()),
        refresh_token: Some(refresh.to_string()),
        token_type: Some("Bearer".to_string()),
    }
}

pub fn backend(server: &MockServer) -> Arc<HttpBackend> {
    Arc::new(HttpBackend::new(server.uri()).expect("mock server uri is valid"))
}
