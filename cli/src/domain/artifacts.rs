//! Compose artifact compilation — pure functions, no I/O.
//!
//! Each compiler takes the merged user document and returns the artifact
//! document. The caller is responsible for reading inputs and writing to disk.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::domain::compose::ComposeDocument;
use crate::domain::config::Port;
use crate::domain::env::{self, DOCKER_SOCKET, PROJECT_MOUNT, Target};
use crate::domain::host::HostIdentity;
use crate::domain::project::{Project, SERVICE_NAME};
use crate::domain::workspace::{BrevWorkspace, INTERACTIVE_PORT_NAME};

// ── Constants ────────────────────────────────────────────────────────────────

/// Directory holding generated artifacts, relative to the project root.
pub const ARTIFACT_DIR: &str = ".devx";

/// Local development artifact.
pub const LOCAL_ARTIFACT: &str = "compose.local.yaml";

/// Cloud launch artifact.
pub const LAUNCHABLE_ARTIFACT: &str = "compose.yaml";

/// Network owned by the engine.
pub const NETWORK_NAME: &str = "devx";

/// Persistent volume for the in-container home directory.
pub const HOME_VOLUME: &str = "devx-home";

/// Home directory of the container's primary user.
pub const HOME_MOUNT: &str = "/home/devx";

/// Host port the interactive service is published on in a launched workspace.
pub const LAUNCHABLE_INTERACTIVE_PORT: u16 = 8888;

/// Sidecar relaxing permissions under the workspace data directory.
pub const PERMISSIONS_SIDECAR: &str = "devx-permissions";

/// Seconds between two permission sweeps of the sidecar.
pub const PERMISSIONS_INTERVAL_SECS: u32 = 30;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// Everything the local compiler reads besides the user document.
pub struct LocalInputs<'a> {
    pub project: &'a Project,
    pub ports: &'a [Port],
    /// Host port for the interactive service.
    pub local_port: u16,
    /// Entries from the project environment file.
    pub env_file: &'a [(String, String)],
    pub host: HostIdentity,
}

/// Everything the launchable compiler reads besides the user document.
pub struct LaunchableInputs<'a> {
    pub project: &'a Project,
    pub workspace: &'a BrevWorkspace,
    /// Entries from the project environment file.
    pub env_file: &'a [(String, String)],
}

// ── Compilers ────────────────────────────────────────────────────────────────

/// Compile the local development document: build from source, bind-mount the
/// live project tree, publish the interactive service on `local_port`.
#[must_use]
pub fn compile_local(mut doc: ComposeDocument, inputs: &LocalInputs<'_>) -> ComposeDocument {
    let environment = environment_for(&doc, inputs.project, Target::Local, None, inputs.env_file);
    let host = inputs.host;

    let service = doc.reserved_service_mut();
    service.remove("image");
    service.insert(
        "build".into(),
        Value::Mapping(mapping([
            ("context", Value::from("../")),
            ("dockerfile", Value::from("Dockerfile")),
            (
                "args",
                Value::Mapping(mapping([
                    ("USER_UID", Value::from(host.uid.to_string())),
                    ("USER_GID", Value::from(host.gid.to_string())),
                    ("DOCKER_GID", Value::from(host.docker_gid.to_string())),
                ])),
            ),
        ])),
    );
    service.insert(
        "ports".into(),
        port_list(inputs.ports, inputs.local_port),
    );
    service.insert(
        "volumes".into(),
        strings([
            format!("../:{PROJECT_MOUNT}:cached"),
            format!("{DOCKER_SOCKET}:{DOCKER_SOCKET}"),
            format!("{HOME_VOLUME}:{HOME_MOUNT}"),
        ]),
    );
    service.insert("ipc".into(), Value::from("host"));
    service.insert("environment".into(), Value::Mapping(environment));
    attach_networks(service);

    declare_owned(&mut doc);
    doc
}

/// Compile the launchable document: pull the pre-built image, mount the
/// checked-out repository, publish the interactive service on the fixed
/// launchable port, and apply the workspace group's host specifics.
#[must_use]
pub fn compile_launchable(
    mut doc: ComposeDocument,
    inputs: &LaunchableInputs<'_>,
) -> ComposeDocument {
    let group = &inputs.workspace.group;
    let data_dir = group.data_dir.as_deref();
    let environment = environment_for(
        &doc,
        inputs.project,
        Target::Launchable,
        data_dir,
        inputs.env_file,
    );

    let checkout = match inputs.workspace.root_suffix() {
        Some(rel) => format!("../{}/{rel}", inputs.project.repo_name()),
        None => format!("../{}", inputs.project.repo_name()),
    };
    let mut volumes = vec![
        format!("{checkout}:{PROJECT_MOUNT}:cached"),
        format!("{DOCKER_SOCKET}:{DOCKER_SOCKET}"),
        format!("{HOME_VOLUME}:{HOME_MOUNT}"),
    ];
    if let Some(dir) = data_dir {
        volumes.push(format!("{0}:{0}", dir.display()));
    }

    let service = doc.reserved_service_mut();
    service.remove("build");
    service.insert(
        "image".into(),
        Value::from(inputs.project.launchable_image()),
    );
    service.insert(
        "ports".into(),
        port_list(&inputs.workspace.ports, LAUNCHABLE_INTERACTIVE_PORT),
    );
    service.insert("volumes".into(), strings(volumes));
    service.insert(
        "group_add".into(),
        strings([group.docker_gid.to_string()]),
    );
    service.insert("ipc".into(), Value::from("host"));
    service.insert("environment".into(), Value::Mapping(environment));
    attach_networks(service);

    if let Some(dir) = data_dir {
        doc.set_service(PERMISSIONS_SIDECAR, permissions_sidecar(dir));
    }

    declare_owned(&mut doc);
    doc
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Baseline, then the user's declared service environment, then the file.
fn environment_for(
    doc: &ComposeDocument,
    project: &Project,
    target: Target,
    data_dir: Option<&Path>,
    env_file: &[(String, String)],
) -> Mapping {
    let declared = env::from_compose(
        doc.service(SERVICE_NAME)
            .and_then(|s| s.get("environment")),
    );
    let merged = env::merge(
        env::baseline(&project.name, target, data_dir),
        [declared.vars.as_slice(), env_file],
    );
    env::to_mapping(&merged, &declared.passthrough)
}

/// `"host:container"` pairs; only the interactive service's host side moves.
fn port_list(ports: &[Port], interactive_host_port: u16) -> Value {
    strings(ports.iter().map(|p| {
        let host = if p.name == INTERACTIVE_PORT_NAME {
            interactive_host_port
        } else {
            p.port
        };
        format!("{host}:{}", p.port)
    }))
}

fn attach_networks(service: &mut Mapping) {
    service.insert("networks".into(), strings(["default", NETWORK_NAME]));
}

fn declare_owned(doc: &mut ComposeDocument) {
    doc.declare_network(NETWORK_NAME, mapping([("driver", Value::from("bridge"))]));
    doc.declare_volume(HOME_VOLUME, Mapping::new());
}

/// Busybox loop granting world rwx to every directory under `data_dir` that
/// is not already world writable.
fn permissions_sidecar(data_dir: &Path) -> Mapping {
    let dir = data_dir.display().to_string();
    let script = format!(
        "while true; do find {dir} -type d ! -perm -o+w -exec chmod o+rwx {{}} +; sleep {PERMISSIONS_INTERVAL_SECS}; done"
    );
    mapping([
        ("image", Value::from("busybox:latest")),
        ("user", Value::from("root")),
        ("restart", Value::from("unless-stopped")),
        ("command", strings(["sh", "-c", script.as_str()])),
        ("volumes", strings([format!("{dir}:{dir}")])),
    ])
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Mapping {
    entries
        .into_iter()
        .map(|(k, v)| (Value::from(k), v))
        .collect()
}

fn strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Value {
    Value::Sequence(items.into_iter().map(|s| Value::String(s.into())).collect())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
