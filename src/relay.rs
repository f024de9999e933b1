//! Dashboard Event Relay
//!
//! Turns webpack dashboard IPC payloads into shared-data updates keyed by
//! `<task>-<kind>`, with two special cases:
//!
//! - dual-build progress: in modern mode, `build` and `build-modern`
//!   progress are merged into one `{ build, build-modern }` object and
//!   republished under both progress keys so the UI can render two
//!   synchronized bars
//! - deferred success: in modern mode a non-serve `build` success is held
//!   back until `build-modern` also succeeds, then both status keys flip
//!   to `Success` together
//!
//! Serve-task status entries additionally drive desktop notifications
//! (failed / fixed / first-run ready).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::RelayError;
use crate::message::{DashboardEntry, EntryKind, IpcMessage, ServeInfo, TaskType};
use crate::notify::{Notification, Notifier, NotifyIcon};
use crate::shared_data::Namespace;
use crate::stats::StatsSource;

const STATUS_SUCCESS: &str = "Success";
const STATUS_FAILED: &str = "Failed";

/// The two halves of a modern-mode build
const DUAL_BUILD: [TaskType; 2] = [TaskType::Build, TaskType::BuildModern];

pub struct DashboardRelay {
    data: Namespace,
    stats: Arc<dyn StatsSource>,
    notifier: Arc<dyn Notifier>,
    /// True until the serve task reports its first success
    first_run: AtomicBool,
    /// Set on serve failure, cleared by the next success
    had_failed: AtomicBool,
    /// Models the host's `ipcOn`/`ipcOff` registration
    attached: AtomicBool,
}

impl DashboardRelay {
    pub fn new(
        data: Namespace,
        stats: Arc<dyn StatsSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            data,
            stats,
            notifier,
            first_run: AtomicBool::new(true),
            had_failed: AtomicBool::new(false),
            attached: AtomicBool::new(false),
        }
    }

    pub fn data(&self) -> &Namespace {
        &self.data
    }

    /// Start forwarding dashboard payloads (`ipcOn`)
    pub fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
    }

    /// Stop forwarding dashboard payloads (`ipcOff`)
    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Reset session flags at serve-task start
    pub fn reset_session(&self) {
        self.first_run.store(true, Ordering::SeqCst);
        self.had_failed.store(false, Ordering::SeqCst);
    }

    /// Clear the six dashboard sub-keys for a task key
    pub fn reset_shared_data(&self, key: &str) {
        self.data.set(&format!("{key}-status"), Value::Null);
        self.data.set(&format!("{key}-progress"), json!(0));
        self.data.set(&format!("{key}-operations"), Value::Null);
        self.data.set(&format!("{key}-stats"), Value::Null);
        self.data.set(&format!("{key}-sizes"), Value::Null);
        self.data.set(&format!("{key}-problems"), Value::Null);
    }

    /// Republish the dev-server URL (`{ vueServe: { url } }` listener)
    pub fn handle_serve_url(&self, info: &ServeInfo) {
        self.data.set("serve-url", Value::String(info.url.clone()));
    }

    fn modern_mode(&self) -> bool {
        self.data
            .get("modern-mode")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Handle one inbound IPC message
    ///
    /// No-op unless a dashboard payload is present and the relay is
    /// attached. A stats ingestion failure aborts the remaining entries of
    /// this message; later messages are unaffected.
    pub async fn handle_message(&self, message: &IpcMessage) -> Result<(), RelayError> {
        let Some(payload) = &message.webpack_dashboard_data else {
            return Ok(());
        };
        if !self.is_attached() {
            return Ok(());
        }

        let modern = self.modern_mode();
        let task = payload.kind;

        for entry in &payload.value {
            let id = format!("{}-{}", task, entry.kind);

            match entry.kind {
                EntryKind::Stats => {
                    let blob = self.stats.load(task).await?;
                    self.data.set(&id, blob);
                    self.stats.discard(task).await?;
                }
                EntryKind::Progress => self.handle_progress(task, modern, &id, &entry.value),
                _ => self.handle_plain(task, modern, &id, entry),
            }
        }
        Ok(())
    }

    fn handle_progress(&self, task: TaskType, modern: bool, id: &str, value: &Value) {
        if task == TaskType::Serve || !modern {
            self.data.set(id, json!({ task.as_str(): value }));
            return;
        }

        // Two synchronized progress bars: merge into one object and
        // republish under both keys.
        let mut progress = self
            .data
            .get(id)
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();
        progress.insert(task.as_str().to_string(), value.clone());

        let mut merged = serde_json::Map::new();
        for t in DUAL_BUILD {
            merged.insert(
                t.as_str().to_string(),
                progress.get(t.as_str()).cloned().unwrap_or(json!(0)),
            );
        }
        let merged = Value::Object(merged);
        for t in DUAL_BUILD {
            self.data.set(&format!("{t}-progress"), merged.clone());
        }
    }

    fn handle_plain(&self, task: TaskType, modern: bool, id: &str, entry: &DashboardEntry) {
        let success_status = entry.kind == EntryKind::Status && entry.value == STATUS_SUCCESS;

        if task != TaskType::Serve && modern && success_status {
            // Hold back "done" until the modern build finishes, then flip
            // both status keys at once.
            if task == TaskType::BuildModern {
                for t in DUAL_BUILD {
                    self.data.set(&format!("{t}-status"), entry.value.clone());
                }
            }
        } else {
            self.data.set(id, entry.value.clone());
        }

        if task == TaskType::Serve && entry.kind == EntryKind::Status {
            self.notify_serve_status(&entry.value);
        }
    }

    fn notify_serve_status(&self, value: &Value) {
        if value == STATUS_FAILED {
            self.notifier.notify(Notification::new(
                "Build failed",
                "The build has errors.",
                NotifyIcon::Error,
            ));
            self.had_failed.store(true, Ordering::SeqCst);
        } else if value == STATUS_SUCCESS {
            if self.had_failed.swap(false, Ordering::SeqCst) {
                self.notifier.notify(Notification::new(
                    "Build fixed",
                    "The build succeeded.",
                    NotifyIcon::Done,
                ));
            } else if self.first_run.swap(false, Ordering::SeqCst) {
                self.notifier.notify(Notification::new(
                    "App ready",
                    "The build succeeded.",
                    NotifyIcon::Done,
                ));
            }
        }
    }
}

impl std::fmt::Debug for DashboardRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardRelay")
            .field("attached", &self.is_attached())
            .finish()
    }
}
