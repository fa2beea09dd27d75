//! Activity events handed to the logging collaborator.
//!
//! Sinks only record; nothing in the pipeline reads them back.

use std::sync::Mutex;

use log::{info, warn};
use serde::Serialize;

use crate::chart::ChartKind;
use crate::recommend::PriorityCategory;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    ChartCreated {
        chart_kind: ChartKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<String>,
    },
    RecommendationsViewed {
        priority: PriorityCategory,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<String>,
    },
}

pub trait ActivitySink: Send + Sync {
    fn record(&self, event: &ActivityEvent);
}

/// Writes each event as one JSON line to the `activity` log target.
#[derive(Debug, Default)]
pub struct LogSink;

impl ActivitySink for LogSink {
    fn record(&self, event: &ActivityEvent) {
        match serde_json::to_string(event) {
            Ok(line) => info!(target: "activity", "{line}"),
            Err(e) => warn!(target: "activity", "could not serialize {event:?}: {e}"),
        }
    }
}

/// Keeps events in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ActivityEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ActivitySink for MemorySink {
    fn record(&self, event: &ActivityEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }
}
