//! Environment injection for the reserved service.
//!
//! Layers, lowest precedence first:
//! 1. baseline keys computed by the engine,
//! 2. `environment` declared on the user's reserved service,
//! 3. the project environment file.
//!
//! Later layers replace values. No layer can remove a baseline key.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};

/// Project environment file, next to the descriptor.
pub const ENV_FILE: &str = "variables.env";

/// Mount point of the project tree inside the container.
pub const PROJECT_MOUNT: &str = "/project";

/// Container runtime socket shared with the service.
pub const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Which artifact the environment is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Local,
    Launchable,
}

impl Target {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Local => "local",
            Target::Launchable => "launchable",
        }
    }
}

/// Ordered environment map.
pub type Environment = BTreeMap<String, String>;

/// Keys the engine always injects.
#[must_use]
pub fn baseline(project_name: &str, target: Target, data_dir: Option<&Path>) -> Environment {
    let mut env = Environment::new();
    env.insert("DEVX_PROJECT_NAME".into(), project_name.to_string());
    env.insert("DEVX_PROJECT_DIR".into(), PROJECT_MOUNT.to_string());
    env.insert("DEVX_TARGET".into(), target.as_str().to_string());
    env.insert("DOCKER_HOST".into(), format!("unix://{DOCKER_SOCKET}"));
    if let Some(dir) = data_dir {
        env.insert("DEVX_DATA_DIR".into(), dir.display().to_string());
    }
    env
}

// ── Environment file ─────────────────────────────────────────────────────────

/// Parsed environment file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    /// Entries in file order. A repeated key keeps its last value on merge.
    pub vars: Vec<(String, String)>,
    /// 1-based numbers of lines that could not be parsed.
    pub skipped: Vec<usize>,
}

impl EnvFile {
    /// Parse dotenv-style content: `KEY=VALUE`, optional `export ` prefix,
    /// `#` comments, single- or double-quoted values.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut file = Self::default();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").map_or(line, str::trim_start);
            match line.split_once('=') {
                Some((key, value)) if is_valid_key(key.trim()) => {
                    file.vars
                        .push((key.trim().to_string(), unquote(value.trim())));
                }
                _ => file.skipped.push(idx + 1),
            }
        }
        file
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return if quote == '"' {
                inner.replace("\\n", "\n").replace("\\\"", "\"")
            } else {
                inner.to_string()
            };
        }
    }
    // Unquoted: ` #` starts a trailing comment.
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}

// ── Compose-declared environment ─────────────────────────────────────────────

/// Environment declared on a compose service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredEnv {
    pub vars: Vec<(String, String)>,
    /// Keys declared without a value; compose takes them from the host.
    pub passthrough: Vec<String>,
}

/// Read an `environment` entry in either compose form: a mapping, or a list
/// of `KEY=VALUE` strings. A bare `KEY` (or `KEY:` with no value) is a
/// passthrough.
#[must_use]
pub fn from_compose(value: Option<&Value>) -> DeclaredEnv {
    let mut declared = DeclaredEnv::default();
    match value {
        Some(Value::Mapping(map)) => {
            for (key, value) in map {
                let Some(key) = key.as_str() else { continue };
                match scalar_to_string(value) {
                    Some(value) => declared.vars.push((key.to_string(), value)),
                    None if value.is_null() => declared.passthrough.push(key.to_string()),
                    None => {}
                }
            }
        }
        Some(Value::Sequence(items)) => {
            for item in items.iter().filter_map(Value::as_str) {
                match item.split_once('=') {
                    Some((key, value)) => declared.vars.push((key.to_string(), value.to_string())),
                    None if is_valid_key(item.trim()) => {
                        declared.passthrough.push(item.trim().to_string());
                    }
                    None => {}
                }
            }
        }
        _ => {}
    }
    declared
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Merge ────────────────────────────────────────────────────────────────────

/// Layer `overrides` on top of `baseline`, in order.
#[must_use]
pub fn merge<'a>(
    baseline: Environment,
    overrides: impl IntoIterator<Item = &'a [(String, String)]>,
) -> Environment {
    let mut env = baseline;
    for layer in overrides {
        for (key, value) in layer {
            env.insert(key.clone(), value.clone());
        }
    }
    env
}

/// Render an environment as a compose mapping. `passthrough` keys that no
/// layer gave a value are rendered as `null`.
#[must_use]
pub fn to_mapping(env: &Environment, passthrough: &[String]) -> Mapping {
    let mut rendered: BTreeMap<&str, Value> = passthrough
        .iter()
        .map(|k| (k.as_str(), Value::Null))
        .collect();
    for (key, value) in env {
        rendered.insert(key.as_str(), Value::from(value.as_str()));
    }
    rendered
        .into_iter()
        .map(|(k, v)| (Value::from(k), v))
        .collect()
}
