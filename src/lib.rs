//! Buildboard - dashboard event relay for build-tool UI integration

pub mod error;
pub mod message;
pub mod notify;
pub mod plugin;
pub mod relay;
pub mod shared_data;
pub mod stats;
pub mod tasks;

pub use error::{FixSuggestion, RelayError};
pub use message::{DashboardEntry, DashboardPayload, EntryKind, IpcMessage, ServeInfo, TaskType};
pub use notify::{LogNotifier, MockNotifier, Notification, Notifier, NotifyIcon};
pub use plugin::{ClientAddon, UiPlugin, CLIENT_ADDON_ID, NAMESPACE_PREFIX};
pub use relay::DashboardRelay;
pub use shared_data::{Namespace, SharedData, SharedDataChange};
pub use stats::{FileStatsSource, MockStatsSource, StatsSource};
pub use tasks::{
    dashboard_tasks, Answers, Choice, Prompt, PromptKind, RunContext, TaskDescriptor, TaskHooks,
    TaskView,
};
