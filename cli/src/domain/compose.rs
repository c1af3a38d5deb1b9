//! Compose document model.
//!
//! A thin wrapper over a YAML mapping that guarantees the top-level
//! `services`, `volumes` and `networks` mappings and a reserved service entry.
//! Content the engine does not own is carried through untouched.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::domain::error::ComposeError;
use crate::domain::project::SERVICE_NAME;

/// User compose file names, in lookup order.
pub const USER_COMPOSE_FILES: &[&str] = &["compose.yaml", "docker-compose.yaml"];

const TOP_LEVEL_KEYS: [&str; 3] = ["services", "volumes", "networks"];

/// A compose document with a guaranteed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDocument {
    root: Mapping,
}

impl Default for ComposeDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl ComposeDocument {
    /// An empty document: empty top-level mappings and an empty reserved
    /// service.
    #[must_use]
    pub fn empty() -> Self {
        let mut doc = Self {
            root: Mapping::new(),
        };
        for key in TOP_LEVEL_KEYS {
            child_mapping(&mut doc.root, key);
        }
        doc.reserved_service_mut();
        doc
    }

    /// Parse user content. Empty content or a YAML `null` is an empty document.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidSyntax` if the content is not YAML, the
    /// root is not a mapping, or a top-level section or the reserved service
    /// is present but not a mapping.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ComposeError> {
        let invalid = |message: String| ComposeError::InvalidSyntax {
            path: path.to_path_buf(),
            message,
        };

        if content.trim().is_empty() {
            return Ok(Self::empty());
        }
        let value: Value = serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let root = match value {
            Value::Null => return Ok(Self::empty()),
            Value::Mapping(m) => m,
            other => {
                return Err(invalid(format!(
                    "expected a mapping at the top level, found {}",
                    kind(&other)
                )));
            }
        };

        for key in TOP_LEVEL_KEYS {
            check_optional_mapping(root.get(key), key).map_err(&invalid)?;
        }
        let services = root.get("services").and_then(Value::as_mapping);
        check_optional_mapping(
            services.and_then(|s| s.get(SERVICE_NAME)),
            &format!("services.{SERVICE_NAME}"),
        )
        .map_err(&invalid)?;

        let mut doc = Self { root };
        for key in TOP_LEVEL_KEYS {
            child_mapping(&mut doc.root, key);
        }
        doc.reserved_service_mut();
        Ok(doc)
    }

    /// Parse a document the engine produced itself.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidSyntax` under the same rules as [`parse`](Self::parse).
    pub fn from_yaml(content: &str) -> Result<Self, ComposeError> {
        Self::parse(content, Path::new("<generated>"))
    }

    /// Serialize to YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.root)
    }

    #[must_use]
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    #[must_use]
    pub fn services(&self) -> &Mapping {
        section(&self.root, "services")
    }

    #[must_use]
    pub fn volumes(&self) -> &Mapping {
        section(&self.root, "volumes")
    }

    #[must_use]
    pub fn networks(&self) -> &Mapping {
        section(&self.root, "networks")
    }

    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Mapping> {
        self.services().get(name).and_then(Value::as_mapping)
    }

    /// The engine-owned service entry.
    pub fn reserved_service_mut(&mut self) -> &mut Mapping {
        let services = child_mapping(&mut self.root, "services");
        child_mapping(services, SERVICE_NAME)
    }

    /// Insert or replace a whole service entry.
    pub fn set_service(&mut self, name: &str, service: Mapping) {
        child_mapping(&mut self.root, "services").insert(name.into(), Value::Mapping(service));
    }

    /// Declare a named volume, replacing any previous declaration.
    pub fn declare_volume(&mut self, name: &str, config: Mapping) {
        child_mapping(&mut self.root, "volumes").insert(name.into(), Value::Mapping(config));
    }

    /// Declare a named network, replacing any previous declaration.
    pub fn declare_network(&mut self, name: &str, config: Mapping) {
        child_mapping(&mut self.root, "networks").insert(name.into(), Value::Mapping(config));
    }
}

/// Get `parent[key]` as a mapping, inserting an empty one when it is absent
/// or not a mapping.
fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = parent
        .entry(Value::from(key))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !slot.is_mapping() {
        *slot = Value::Mapping(Mapping::new());
    }
    match slot {
        Value::Mapping(m) => m,
        _ => unreachable!("slot was just set to a mapping"),
    }
}

fn section<'a>(root: &'a Mapping, key: &str) -> &'a Mapping {
    static EMPTY: std::sync::LazyLock<Mapping> = std::sync::LazyLock::new(Mapping::new);
    root.get(key).and_then(Value::as_mapping).unwrap_or(&EMPTY)
}

fn check_optional_mapping(value: Option<&Value>, what: &str) -> Result<(), String> {
    match value {
        None | Some(Value::Null | Value::Mapping(_)) => Ok(()),
        Some(other) => Err(format!("`{what}` must be a mapping, found {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
