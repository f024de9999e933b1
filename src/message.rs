//! IPC wire types for dashboard payloads
//!
//! Field names mirror the JSON the webpack dashboard plugin emits over the
//! host IPC channel, so messages deserialize straight off the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level IPC message envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcMessage {
    /// Dashboard payload from the webpack plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpack_dashboard_data: Option<DashboardPayload>,

    /// Dev-server announcement carrying the local URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vue_serve: Option<ServeInfo>,
}

/// One dashboard message: a task type plus a batch of entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub value: Vec<DashboardEntry>,
}

/// The task a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    Serve,
    Build,
    BuildModern,
}

impl TaskType {
    /// Wire string, also the shared-data key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Serve => "serve",
            TaskType::Build => "build",
            TaskType::BuildModern => "build-modern",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dashboard entry (`{ type, value }`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub value: Value,
}

/// Entry kinds the relay understands
///
/// Unknown kinds still relay verbatim under `<task>-<kind>`, so the enum
/// keeps a catch-all instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    Stats,
    Progress,
    Status,
    Operations,
    Sizes,
    Problems,
    Other(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Stats => "stats",
            EntryKind::Progress => "progress",
            EntryKind::Status => "status",
            EntryKind::Operations => "operations",
            EntryKind::Sizes => "sizes",
            EntryKind::Problems => "problems",
            EntryKind::Other(s) => s,
        }
    }
}

impl From<String> for EntryKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "stats" => EntryKind::Stats,
            "progress" => EntryKind::Progress,
            "status" => EntryKind::Status,
            "operations" => EntryKind::Operations,
            "sizes" => EntryKind::Sizes,
            "problems" => EntryKind::Problems,
            _ => EntryKind::Other(s),
        }
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ vueServe: { url } }` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeInfo {
    pub url: String,
}
