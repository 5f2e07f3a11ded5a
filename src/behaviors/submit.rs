//! Form submission backends.
//!
//! A [`Submitter`] receives the validated payload of a form and later calls
//! `done` with the outcome. The page host has no network, so the stock
//! [`SimulatedSubmitter`] simply accepts after a fixed latency.

use crate::page::Page;
use serde::Serialize;

/// Field name (or id) → value pairs, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormPayload {
    pub form_id: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(String),
}

pub type SubmitCallback = Box<dyn FnOnce(&mut Page, SubmitOutcome)>;

pub trait Submitter {
    fn submit(&self, page: &mut Page, payload: FormPayload, done: SubmitCallback);
}

/// Accepts every submission after `latency_ms` without sending anything.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    latency_ms: u64,
}

impl SimulatedSubmitter {
    pub fn new(latency_ms: u64) -> Self {
        Self { latency_ms }
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, page: &mut Page, payload: FormPayload, done: SubmitCallback) {
        tracing::debug!(
            payload = %serde_json::to_string(&payload).unwrap_or_default(),
            latency_ms = self.latency_ms,
            "simulated submission"
        );
        page.set_timeout(self.latency_ms, move |page| done(page, SubmitOutcome::Accepted));
    }
}

/// Rejects every submission after `latency_ms` with a fixed reason.
#[derive(Debug, Clone)]
pub struct RejectingSubmitter {
    latency_ms: u64,
    reason: String,
}

impl RejectingSubmitter {
    pub fn new(latency_ms: u64, reason: &str) -> Self {
        Self {
            latency_ms,
            reason: reason.to_string(),
        }
    }
}

impl Submitter for RejectingSubmitter {
    fn submit(&self, page: &mut Page, _payload: FormPayload, done: SubmitCallback) {
        let reason = self.reason.clone();
        page.set_timeout(self.latency_ms, move |page| {
            done(page, SubmitOutcome::Rejected(reason))
        });
    }
}
