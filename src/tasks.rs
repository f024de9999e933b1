//! Task descriptors, prompt forms, and lifecycle hooks
//!
//! A host adapter matches command lines against [`TaskDescriptor`]s, renders
//! the prompts, and invokes the [`TaskHooks`] at the documented lifecycle
//! points: `on_before_run` (argument building + state reset), `on_run`
//! (attach the relay), `on_exit` (detach, clear transient keys).

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RelayError;
use crate::relay::DashboardRelay;

/// Prompt input widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    List,
    Input,
    Confirm,
}

/// One option of a list prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: Value,
}

/// A prompt form field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PromptKind,
    pub default: Value,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub choices: Vec<Choice>,
    pub description: String,
}

impl Prompt {
    pub fn list(
        name: &str,
        default: &str,
        choices: &[&str],
        description: &str,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PromptKind::List,
            default: json!(default),
            choices: choices
                .iter()
                .map(|c| Choice {
                    name: (*c).into(),
                    value: json!(c),
                })
                .collect(),
            description: description.into(),
        }
    }

    pub fn input(name: &str, default: Value, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: PromptKind::Input,
            default,
            choices: Vec::new(),
            description: description.into(),
        }
    }

    pub fn confirm(name: &str, default: bool, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: PromptKind::Confirm,
            default: json!(default),
            choices: Vec::new(),
            description: description.into(),
        }
    }
}

/// Prompt answers collected by the host, keyed by prompt name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Answers(serde_json::Map<String, Value>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// True when a confirm prompt was answered yes
    pub fn is_confirmed(&self, name: &str) -> bool {
        self.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Answer rendered as a bare CLI argument, `None` when absent or null
    pub fn arg_value(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Mutable context passed to `on_before_run`
#[derive(Debug, Default)]
pub struct RunContext {
    pub answers: Answers,
    pub args: Vec<String>,
}

impl RunContext {
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            args: Vec::new(),
        }
    }

    pub fn push_option(&mut self, flag: &str, value: &str) {
        self.args.push(flag.into());
        self.args.push(value.into());
    }

    pub fn push_flag(&mut self, flag: &str) {
        self.args.push(flag.into());
    }
}

/// Lifecycle hooks a host adapter invokes around a task run
pub trait TaskHooks: Send + Sync {
    fn on_before_run(&self, _ctx: &mut RunContext) {}
    fn on_run(&self) {}
    fn on_exit(&self) {}
}

/// A dashboard view a task exposes in the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub component: String,
}

pub const DASHBOARD_VIEW_ID: &str = "org.vueneue.webpack.views.dashboard";
pub const ANALYZER_VIEW_ID: &str = "org.vueneue.webpack.views.analyzer";

/// The two views shared by every dashboard-enabled task
static DASHBOARD_VIEWS: Lazy<Vec<TaskView>> = Lazy::new(|| {
    vec![
        TaskView {
            id: DASHBOARD_VIEW_ID.into(),
            label: "Dashboard".into(),
            icon: "dashboard".into(),
            component: "org.vueneue.webpack.components.dashboard".into(),
        },
        TaskView {
            id: ANALYZER_VIEW_ID.into(),
            label: "Analyzer".into(),
            icon: "donut_large".into(),
            component: "org.vueneue.webpack.components.analyzer".into(),
        },
    ]
});

/// A task registered with the host UI runtime
#[derive(Clone)]
pub struct TaskDescriptor {
    match_cmd: Regex,
    pub description: String,
    pub prompts: Vec<Prompt>,
    pub views: Vec<TaskView>,
    pub default_view: Option<String>,
    pub hooks: Option<Arc<dyn TaskHooks>>,
}

impl TaskDescriptor {
    pub fn new(pattern: &str, description: &str) -> Result<Self, RelayError> {
        Ok(Self {
            match_cmd: Regex::new(pattern)?,
            description: description.into(),
            prompts: Vec::new(),
            views: Vec::new(),
            default_view: None,
            hooks: None,
        })
    }

    pub fn with_prompts(mut self, prompts: Vec<Prompt>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_dashboard_views(mut self) -> Self {
        self.views = DASHBOARD_VIEWS.clone();
        self.default_view = Some(DASHBOARD_VIEW_ID.into());
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn TaskHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Test a task command line against this descriptor
    pub fn matches(&self, command: &str) -> bool {
        self.match_cmd.is_match(command)
    }

    pub fn pattern(&self) -> &str {
        self.match_cmd.as_str()
    }
}

impl std::fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("pattern", &self.pattern())
            .field("description", &self.description)
            .field("prompts", &self.prompts.len())
            .finish()
    }
}

const ENV_CHOICES: [&str; 3] = ["development", "production", "test"];

/// Hooks for `ssr:serve`: dashboard args, transient-state reset, relay
/// attach for the lifetime of the dev server
pub struct ServeHooks {
    relay: Arc<DashboardRelay>,
}

impl TaskHooks for ServeHooks {
    fn on_before_run(&self, ctx: &mut RunContext) {
        for flag in ["mode", "host", "port"] {
            if let Some(value) = ctx.answers.arg_value(flag) {
                ctx.push_option(&format!("--{flag}"), &value);
            }
        }
        ctx.push_flag("--dashboard");

        self.relay.data().remove("serve-url");
        self.relay.reset_shared_data("serve");
        self.relay.reset_session();
    }

    fn on_run(&self) {
        self.relay.attach();
    }

    fn on_exit(&self) {
        self.relay.detach();
        self.relay.data().remove("serve-url");
    }
}

/// Hooks for `ssr:build`: build args and relay attach for the build
pub struct BuildHooks {
    relay: Arc<DashboardRelay>,
}

impl TaskHooks for BuildHooks {
    fn on_before_run(&self, ctx: &mut RunContext) {
        if let Some(mode) = ctx.answers.arg_value("mode") {
            ctx.push_option("--mode", &mode);
        }
        if ctx.answers.is_confirmed("report") {
            ctx.push_flag("--report");
        }
        if ctx.answers.is_confirmed("watch") {
            ctx.push_flag("--watch");
        }
        ctx.push_flag("--dashboard");

        self.relay.reset_shared_data("ssr-build");
    }

    fn on_run(&self) {
        self.relay.attach();
    }

    fn on_exit(&self) {
        self.relay.detach();
    }
}

/// Hooks for `ssr:start`: argument forwarding only, no dashboard
pub struct StartHooks;

impl TaskHooks for StartHooks {
    fn on_before_run(&self, ctx: &mut RunContext) {
        for flag in ["mode", "host", "port"] {
            if let Some(value) = ctx.answers.arg_value(flag) {
                ctx.push_option(&format!("--{flag}"), &value);
            }
        }
    }
}

/// The built-in task descriptors, in registration order
pub fn dashboard_tasks(relay: &Arc<DashboardRelay>) -> Result<Vec<TaskDescriptor>, RelayError> {
    Ok(vec![
        TaskDescriptor::new(
            r"vue-cli-service ssr:serve",
            "SSR: Start development server with HMR",
        )?
        .with_prompts(vec![
            Prompt::list("mode", "development", &ENV_CHOICES, "Specify env"),
            Prompt::input("host", json!("127.0.0.1"), "Specify host"),
            Prompt::input("port", json!(8080), "Specify port"),
        ])
        .with_dashboard_views()
        .with_hooks(Arc::new(ServeHooks {
            relay: relay.clone(),
        })),
        TaskDescriptor::new(
            r"vue-cli-service ssr:build",
            "SSR: Make a production build",
        )?
        .with_prompts(vec![
            Prompt::list("mode", "production", &ENV_CHOICES, "Specify env"),
            Prompt::confirm("report", false, "Generate report files"),
            Prompt::confirm("watch", false, "Enable watch mode"),
        ])
        .with_dashboard_views()
        .with_hooks(Arc::new(BuildHooks {
            relay: relay.clone(),
        })),
        TaskDescriptor::new(
            r"vue-cli-service ssr:start",
            "SSR: Start production server",
        )?
        .with_prompts(vec![
            Prompt::list("mode", "production", &ENV_CHOICES, "Specify env"),
            Prompt::input("host", json!("0.0.0.0"), "Specify host"),
            Prompt::input("port", json!(8080), "Specify port"),
        ])
        .with_hooks(Arc::new(StartHooks)),
        TaskDescriptor::new(r"vue-cli-service generate", "Generate static website")?,
    ])
}
