//! Plugin wiring
//!
//! [`UiPlugin`] assembles the pieces a host adapter registers with the UI
//! runtime: the client addon, the task descriptors, the project-open reset,
//! and the global IPC listener. The host owns transport and rendering; this
//! type owns the behavior behind each registration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::message::IpcMessage;
use crate::notify::Notifier;
use crate::relay::DashboardRelay;
use crate::shared_data::SharedData;
use crate::stats::StatsSource;
use crate::tasks::{dashboard_tasks, TaskDescriptor};

pub const CLIENT_ADDON_ID: &str = "org.vueneue.webpack.client-addon";

/// Prefix for every shared-data key this plugin touches
pub const NAMESPACE_PREFIX: &str = "org.vue.webpack.";

/// Keys reset when a project opens
const PROJECT_OPEN_KEYS: [&str; 2] = ["ssr-serve", "ssr-build"];

/// Client addon registration (`api.addClientAddon`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAddon {
    pub id: String,
    pub path: PathBuf,
}

pub struct UiPlugin {
    store: SharedData,
    relay: Arc<DashboardRelay>,
    tasks: Vec<TaskDescriptor>,
}

impl UiPlugin {
    pub fn new(
        store: SharedData,
        stats: Arc<dyn StatsSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, RelayError> {
        let relay = Arc::new(DashboardRelay::new(
            store.namespace(NAMESPACE_PREFIX),
            stats,
            notifier,
        ));
        let tasks = dashboard_tasks(&relay)?;
        Ok(Self {
            store,
            relay,
            tasks,
        })
    }

    /// Addon metadata for the host to register
    pub fn client_addon(&self) -> ClientAddon {
        ClientAddon {
            id: CLIENT_ADDON_ID.into(),
            path: PathBuf::from("ui-addon-dist"),
        }
    }

    pub fn store(&self) -> &SharedData {
        &self.store
    }

    pub fn relay(&self) -> &Arc<DashboardRelay> {
        &self.relay
    }

    /// Task descriptors in registration order
    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    /// First descriptor whose pattern matches a task command line
    pub fn find_task(&self, command: &str) -> Option<&TaskDescriptor> {
        self.tasks.iter().find(|t| t.matches(command))
    }

    /// Initialize dashboard state when a project opens
    pub fn on_project_open(&self) {
        for key in PROJECT_OPEN_KEYS {
            self.relay.reset_shared_data(key);
        }
    }

    /// Global IPC listener
    ///
    /// Serve-URL announcements are republished regardless of relay
    /// attachment; dashboard payloads only flow while a task holds the
    /// relay attached.
    pub async fn handle_ipc(&self, message: &IpcMessage) -> Result<(), RelayError> {
        if let Some(info) = &message.vue_serve {
            self.relay.handle_serve_url(info);
        }
        self.relay.handle_message(message).await
    }
}
