//! End-to-end pipeline runs over a scripted executor and an in-memory
//! state store: no network, no real git.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use subsync_core::{Config, SyncRecord, SyncTag};
use subsync_engine::Pipeline;
use subsync_git::{CommandExecutor, CommandResult};
use subsync_store::{StoreError, SyncStateStore};

const FIXED_DATE: &str = "Thu, 06 Aug 2026 12:00:00 +0000";

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    args: Vec<String>,
    cwd: PathBuf,
}

impl Invocation {
    fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// Succeeds on everything; stdout can be scripted per git subcommand.
#[derive(Clone, Default)]
struct ScriptedExecutor {
    calls: Arc<Mutex<Vec<Invocation>>>,
    stdout: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
}

impl ScriptedExecutor {
    fn respond(&self, subcommand: &str, stdout: &str) {
        self.stdout
            .lock()
            .unwrap()
            .entry(subcommand.to_owned())
            .or_default()
            .push_back(stdout.to_owned());
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_of(&self, subcommand: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|call| call.subcommand() == subcommand)
            .collect()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(
        &self,
        _program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandResult, std::io::Error> {
        let invocation = Invocation {
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        };
        let stdout = self
            .stdout
            .lock()
            .unwrap()
            .get_mut(invocation.subcommand())
            .and_then(VecDeque::pop_front)
            .unwrap_or_default();
        self.calls.lock().unwrap().push(invocation);
        Ok(CommandResult::ok(stdout))
    }
}

#[derive(Default)]
struct InMemoryStore {
    records: HashMap<String, SyncRecord>,
}

impl InMemoryStore {
    fn seeded(tag: &SyncTag, sha: &str) -> Self {
        let mut store = Self::default();
        store.records.insert(
            tag.as_str().to_owned(),
            SyncRecord {
                sha: sha.to_owned(),
                synced_at: FIXED_DATE.to_owned(),
            },
        );
        store
    }
}

impl SyncStateStore for InMemoryStore {
    fn read(&self, tag: &SyncTag) -> Result<Option<SyncRecord>, StoreError> {
        Ok(self.records.get(tag.as_str()).cloned())
    }

    fn write(&mut self, tag: &SyncTag, sha: &str) -> Result<(), StoreError> {
        self.records.insert(
            tag.as_str().to_owned(),
            SyncRecord {
                sha: sha.to_owned(),
                synced_at: FIXED_DATE.to_owned(),
            },
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn config(source: &str, target: &str) -> Config {
    let env = HashMap::from([
        ("GITHUB_ACTOR", "octocat"),
        ("INPUT_GITHUB_TOKEN", "t0ken"),
        ("INPUT_SOURCE", source),
        ("INPUT_SOURCE_BRANCH", "main"),
        ("INPUT_TARGET", target),
        ("INPUT_GIST", "abc123"),
    ]);
    Config::from_lookup(|key| env.get(key).map(|v| (*v).to_owned())).unwrap()
}

const REAL_PATCH: &str = "From 1111111 Mon Sep 17 00:00:00 2001\n\
                          Subject: add widget\n\n---\n diff --git a/x b/x\n";

// ---------------------------------------------------------------------------
// First-ever sync
// ---------------------------------------------------------------------------

#[test]
fn first_sync_applies_full_history_and_records_head() {
    let workdir = TempDir::new().unwrap();
    let config = config("org/src/a/b", "org/dst/x");
    let executor = ScriptedExecutor::default();
    executor.respond("log", "newhead111\n");
    executor.respond("format-patch", REAL_PATCH);

    let mut pipeline = Pipeline::new(
        &config,
        InMemoryStore::default(),
        executor.clone(),
        workdir.path(),
    );
    let outcome = pipeline.run().unwrap();

    assert!(outcome.applied);
    assert_eq!(outcome.source_head, "newhead111");
    assert!(outcome.previous.is_none());

    // Full-history fetch: no shallow-since cutoff.
    let fetches = executor.calls_of("fetch");
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].args, vec!["fetch", "origin", "main"]);

    // Full-history patch restricted to the source subdirectory.
    let patches = executor.calls_of("format-patch");
    assert_eq!(patches.len(), 1);
    assert!(
        !patches[0].args.iter().any(|arg| arg.ends_with("..")),
        "first sync must not pass a commit range: {:?}",
        patches[0].args
    );
    assert_eq!(
        patches[0].args[patches[0].args.len() - 2..],
        ["--".to_owned(), "a/b".to_owned()]
    );

    // Applied with the strip count for a/b and redirected into x.
    let ams = executor.calls_of("am");
    assert_eq!(ams.len(), 1);
    assert_eq!(ams[0].args[..3], ["am", "-p3", "--directory=x"]);
    assert_eq!(ams[0].cwd, workdir.path().join("target"));

    let pushes = executor.calls_of("push");
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].args, vec!["push", "origin", "HEAD:main"]);

    // Patch file lands in the workdir.
    let written = std::fs::read_to_string(workdir.path().join("patch")).unwrap();
    assert_eq!(written, REAL_PATCH);
}

#[test]
fn first_sync_writes_record_with_fetched_head() {
    let workdir = TempDir::new().unwrap();
    let config = config("org/src/a", "org/dst");
    let executor = ScriptedExecutor::default();
    executor.respond("log", "newhead111\n");
    executor.respond("format-patch", REAL_PATCH);

    let mut pipeline = Pipeline::new(
        &config,
        InMemoryStore::default(),
        executor,
        workdir.path(),
    );
    pipeline.run().unwrap();

    let record = pipeline.read_previous().unwrap().unwrap();
    assert_eq!(record.sha, "newhead111");
}

// ---------------------------------------------------------------------------
// Second sync, nothing new
// ---------------------------------------------------------------------------

#[test]
fn unchanged_sync_skips_target_but_still_records() {
    let workdir = TempDir::new().unwrap();
    let config = config("org/src/a/b", "org/dst/x");
    let executor = ScriptedExecutor::default();
    executor.respond("log", "sameold222\n");
    // format-patch unscripted: empty stdout, i.e. an empty patch.

    let store = InMemoryStore::seeded(&config.tag(), "sameold222");
    let mut pipeline = Pipeline::new(&config, store, executor.clone(), workdir.path());
    let outcome = pipeline.run().unwrap();

    assert!(!outcome.applied);
    assert_eq!(outcome.previous.unwrap().sha, "sameold222");

    // Delta-bounded fetch and patch range.
    let fetches = executor.calls_of("fetch");
    assert_eq!(
        fetches[0].args,
        vec![
            "fetch".to_owned(),
            format!("--shallow-since={FIXED_DATE}"),
            "origin".to_owned(),
            "main".to_owned()
        ]
    );
    let patches = executor.calls_of("format-patch");
    assert!(patches[0].args.contains(&"sameold222..".to_owned()));

    // No target clone, apply, or push.
    assert!(executor.calls_of("am").is_empty());
    assert!(executor.calls_of("push").is_empty());
    assert!(
        !executor
            .calls()
            .iter()
            .any(|call| call.cwd == workdir.path().join("target")),
        "target directory must not be touched"
    );

    // The record is still rewritten with the (unchanged) head.
    assert_eq!(pipeline.read_previous().unwrap().unwrap().sha, "sameold222");
}

// ---------------------------------------------------------------------------
// Whole-repository sync (no subdirectories)
// ---------------------------------------------------------------------------

#[test]
fn whole_repo_sync_uses_no_sparse_checkout_and_strip_one() {
    let workdir = TempDir::new().unwrap();
    let config = config("org/src", "org/dst");
    let executor = ScriptedExecutor::default();
    executor.respond("log", "head333\n");
    executor.respond("format-patch", REAL_PATCH);

    let mut pipeline = Pipeline::new(
        &config,
        InMemoryStore::default(),
        executor.clone(),
        workdir.path(),
    );
    let outcome = pipeline.run().unwrap();
    assert!(outcome.applied);

    // No sparse checkout config and no path filter.
    assert!(executor.calls_of("config").is_empty());
    let patches = executor.calls_of("format-patch");
    assert!(!patches[0].args.contains(&"--".to_owned()));

    // Only the a/ b/ prefix is stripped; no --directory remap.
    let ams = executor.calls_of("am");
    assert_eq!(ams[0].args[1], "-p1");
    assert!(!ams[0].args.iter().any(|arg| arg.starts_with("--directory")));
}

// ---------------------------------------------------------------------------
// Clone hygiene
// ---------------------------------------------------------------------------

#[test]
fn stale_clone_directories_are_reset() {
    let workdir = TempDir::new().unwrap();
    let stale = workdir.path().join("source").join("leftover");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("junk.txt"), "junk").unwrap();

    let config = config("org/src/a", "org/dst");
    let executor = ScriptedExecutor::default();
    executor.respond("log", "head444\n");

    let mut pipeline = Pipeline::new(
        &config,
        InMemoryStore::default(),
        executor,
        workdir.path(),
    );
    pipeline.run().unwrap();

    assert!(
        !stale.exists(),
        "leftover contents must be removed before the fresh clone"
    );
    assert!(workdir.path().join("source").exists());
}
