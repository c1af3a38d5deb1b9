//! Unit tests for the sync service: freshness, laziness and per-artifact
//! independence.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use devx_cli::application::services::config_loader::LoadedConfig;
use devx_cli::application::services::sync::{
    ArtifactKind, ArtifactOutcome, ProjectResolver, SyncOptions, SyncReport, sync_artifacts,
};
use devx_cli::domain::compose::ComposeDocument;
use devx_cli::domain::staleness::StaleReason;

use crate::helpers::{ORIGIN, PYPROJECT, PYPROJECT_WITH_URLS, USER_COMPOSE, load, project_fs, root};
use crate::mocks::{CountingCompiler, FixedHost, MemFs, RecordingReporter, StaticRemote};

struct Run {
    report: SyncReport,
    compiler: CountingCompiler,
    remote_calls: usize,
    host_calls: usize,
    reporter: RecordingReporter,
}

fn sync_with(
    fs: &MemFs,
    config: &LoadedConfig,
    remote: &StaticRemote,
    host: &FixedHost,
    opts: &SyncOptions,
) -> Run {
    let compiler = CountingCompiler::default();
    let reporter = RecordingReporter::default();
    let resolver = ProjectResolver::new(&config.project, remote);
    let report = sync_artifacts(config, fs, &resolver, host, &compiler, &reporter, opts);
    Run {
        report,
        compiler,
        remote_calls: remote.calls.get(),
        host_calls: host.calls.get(),
        reporter,
    }
}

fn sync(fs: &MemFs, config: &LoadedConfig, opts: &SyncOptions) -> Run {
    sync_with(
        fs,
        config,
        &StaticRemote::new(ORIGIN),
        &FixedHost::new(),
        opts,
    )
}

fn outcome(report: &SyncReport, kind: ArtifactKind) -> &ArtifactOutcome {
    &report.get(kind).expect("artifact reported").outcome
}

fn regenerated(report: &SyncReport, kind: ArtifactKind) -> Option<&StaleReason> {
    match outcome(report, kind) {
        ArtifactOutcome::Regenerated(reason) => Some(reason),
        _ => None,
    }
}

fn artifact(fs: &MemFs, kind: ArtifactKind) -> Option<String> {
    fs.content(&kind.path(&root()))
}

// ── Freshness ─────────────────────────────────────────────────────────────────

#[test]
fn test_first_sync_writes_both_artifacts() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);

    let run = sync(&fs, &config, &SyncOptions::default());

    assert!(run.report.is_success());
    for kind in ArtifactKind::ALL {
        assert_eq!(regenerated(&run.report, kind), Some(&StaleReason::Missing));
        assert!(artifact(&fs, kind).is_some(), "{} not written", kind.label());
    }
    assert_eq!(run.compiler.local.get(), 1);
    assert_eq!(run.compiler.launchable.get(), 1);
    assert_eq!(run.remote_calls, 1, "remote must be queried once");
    assert_eq!(run.host_calls, 1);
    assert_eq!(run.reporter.successes.borrow().len(), 2);
}

#[test]
fn test_fresh_artifacts_skip_compilation_and_external_queries() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());
    let writes = fs.write_count();

    let run = sync(&fs, &config, &SyncOptions::default());

    for kind in ArtifactKind::ALL {
        assert!(matches!(outcome(&run.report, kind), ArtifactOutcome::UpToDate));
    }
    assert_eq!(run.compiler.total(), 0);
    assert_eq!(run.remote_calls, 0);
    assert_eq!(run.host_calls, 0);
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn test_newer_source_regenerates_both() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());

    fs.advance(10);
    let compose = root().join("compose.yaml");
    fs.touch(&compose);
    let run = sync(&fs, &config, &SyncOptions::default());

    for kind in ArtifactKind::ALL {
        assert_eq!(
            regenerated(&run.report, kind),
            Some(&StaleReason::SourceNewer(compose.clone()))
        );
    }
    assert_eq!(run.compiler.total(), 2);
}

#[test]
fn test_new_env_file_is_picked_up() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());

    fs.advance(5);
    fs.put(root().join("variables.env"), "NGC_API_KEY=abc\n");
    let run = sync(&fs, &config, &SyncOptions::default());

    assert!(run.report.is_success());
    let local = artifact(&fs, ArtifactKind::Local).unwrap();
    assert!(local.contains("NGC_API_KEY"), "{local}");
}

#[test]
fn test_force_regenerates_fresh_artifacts() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());

    let run = sync(&fs, &config, &SyncOptions::forced());

    for kind in ArtifactKind::ALL {
        assert_eq!(regenerated(&run.report, kind), Some(&StaleReason::Forced));
    }
}

#[test]
fn test_force_local_with_port_leaves_launchable_alone() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());

    let opts = SyncOptions {
        force_local: true,
        local_port: 9999,
        ..SyncOptions::default()
    };
    let run = sync(&fs, &config, &opts);

    assert_eq!(
        regenerated(&run.report, ArtifactKind::Local),
        Some(&StaleReason::Forced)
    );
    assert!(matches!(
        outcome(&run.report, ArtifactKind::Launchable),
        ArtifactOutcome::UpToDate
    ));
    assert!(artifact(&fs, ArtifactKind::Local).unwrap().contains("9999:8888"));
    assert!(artifact(&fs, ArtifactKind::Launchable).unwrap().contains("8888:8888"));
}

// ── Independence and laziness ─────────────────────────────────────────────────

#[test]
fn test_local_failure_does_not_block_launchable() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);

    let run = sync_with(
        &fs,
        &config,
        &StaticRemote::new(ORIGIN),
        &FixedHost::failing(),
        &SyncOptions::default(),
    );

    assert!(!run.report.is_success());
    assert!(matches!(
        outcome(&run.report, ArtifactKind::Local),
        ArtifactOutcome::Failed(_)
    ));
    assert_eq!(
        regenerated(&run.report, ArtifactKind::Launchable),
        Some(&StaleReason::Missing)
    );
    assert!(artifact(&fs, ArtifactKind::Local).is_none());
    assert!(artifact(&fs, ArtifactKind::Launchable).is_some());
    assert_eq!(run.report.failures().count(), 1);
    assert_eq!(run.reporter.warnings.borrow().len(), 1);
}

#[test]
fn test_remote_failure_is_queried_once_and_fails_both() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);

    let run = sync_with(
        &fs,
        &config,
        &StaticRemote::failing(),
        &FixedHost::new(),
        &SyncOptions::default(),
    );

    assert_eq!(run.report.failures().count(), 2);
    assert_eq!(run.remote_calls, 1);
    if let ArtifactOutcome::Failed(e) = outcome(&run.report, ArtifactKind::Launchable) {
        assert!(e.to_string().contains("origin"), "got: {e}");
    }
}

#[test]
fn test_unsupported_remote_is_reported() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);

    let run = sync_with(
        &fs,
        &config,
        &StaticRemote::new("svn://example.com/repo"),
        &FixedHost::new(),
        &SyncOptions::default(),
    );

    let ArtifactOutcome::Failed(e) = outcome(&run.report, ArtifactKind::Launchable) else {
        panic!("expected failure");
    };
    assert!(e.to_string().contains("Unsupported remote URL format"), "got: {e}");
}

#[test]
fn test_declared_urls_never_query_remote() {
    let fs = project_fs(PYPROJECT_WITH_URLS);
    let config = load(&fs);

    let run = sync_with(
        &fs,
        &config,
        &StaticRemote::failing(),
        &FixedHost::new(),
        &SyncOptions::default(),
    );

    assert!(run.report.is_success());
    assert_eq!(run.remote_calls, 0);
}

#[test]
fn test_invalid_user_compose_fails_both_artifacts() {
    let fs = project_fs(PYPROJECT_WITH_URLS);
    fs.put(root().join("compose.yaml"), "services: [db]\n");
    let config = load(&fs);

    let run = sync(&fs, &config, &SyncOptions::default());

    assert_eq!(run.report.failures().count(), 2);
    assert_eq!(run.compiler.total(), 0);
    let ArtifactOutcome::Failed(e) = outcome(&run.report, ArtifactKind::Local) else {
        panic!("expected failure");
    };
    assert!(e.to_string().contains("Invalid compose syntax"), "got: {e}");
}

// ── Written content ───────────────────────────────────────────────────────────

#[test]
fn test_launchable_artifact_content() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);
    sync(&fs, &config, &SyncOptions::default());

    let text = artifact(&fs, ArtifactKind::Launchable).unwrap();
    assert!(text.starts_with("# Generated by devx"));
    let doc = ComposeDocument::from_yaml(&text).unwrap();
    assert_eq!(
        doc.service("db"),
        ComposeDocument::parse(USER_COMPOSE, &PathBuf::from("compose.yaml"))
            .unwrap()
            .service("db")
    );
    let devx = doc.service("devx").expect("reserved service");
    assert_eq!(
        devx.get("image").and_then(|v| v.as_str()),
        Some("ghcr.io/org/demo/devx:main")
    );
    assert!(devx.get("build").is_none());
}

#[test]
fn test_missing_user_compose_compiles_from_empty_document() {
    let fs = MemFs::new();
    fs.mkdir(root().join(".git"));
    fs.put(root().join("pyproject.toml"), PYPROJECT_WITH_URLS);
    let config = load(&fs);

    let run = sync(&fs, &config, &SyncOptions::default());

    assert!(run.report.is_success());
    let doc = ComposeDocument::from_yaml(&artifact(&fs, ArtifactKind::Local).unwrap()).unwrap();
    assert_eq!(doc.services().len(), 1);
    assert!(doc.service("devx").unwrap().contains_key("build"));
}
