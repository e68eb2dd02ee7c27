//! Command-line flows against a preference file in a temp directory

use clap::Parser;
use feedkit::cli::{self, Cli};
use feedkit::{JsonFileStore, PreferenceStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = format!(
            "[remote]\nbase_url = \"http://127.0.0.1:9\"\n\n[storage]\npreferences_file = {:?}\n",
            dir.path().join("preferences.json")
        );
        std::fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    async fn run(&self, args: &[&str]) -> anyhow::Result<()> {
        let config = self.config();
        let mut argv = vec!["feedkit", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        cli::run(Cli::try_parse_from(argv).unwrap()).await
    }

    async fn store(&self) -> JsonFileStore {
        JsonFileStore::open(self.dir.path().join("preferences.json"))
            .await
            .unwrap()
    }
}

async fn get(store: &JsonFileStore, key: &str) -> Option<String> {
    store.get(key).await.unwrap()
}

#[tokio::test]
async fn test_select_merges_into_stored_selection() {
    let sandbox = Sandbox::new();

    sandbox
        .run(&["select", "--machine", "A", "--spindle", "B"])
        .await
        .unwrap();
    sandbox
        .run(&["select", "--material", "D", "--bit", "C", "--remember"])
        .await
        .unwrap();

    let store = sandbox.store().await;
    assert_eq!(get(&store, "selection.machine").await.as_deref(), Some("A"));
    assert_eq!(get(&store, "selection.bit").await.as_deref(), Some("C"));
    assert_eq!(
        get(&store, "selection.remember").await.as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_adjust_only_persists_with_save() {
    let sandbox = Sandbox::new();

    sandbox.run(&["adjust", "0.3"]).await.unwrap();
    assert_eq!(get(&sandbox.store().await, "result.multiplier").await, None);

    sandbox.run(&["adjust", "0.3", "--save"]).await.unwrap();
    assert_eq!(
        get(&sandbox.store().await, "result.multiplier")
            .await
            .as_deref(),
        Some("1.3")
    );

    sandbox.run(&["adjust", "-0.5", "--save"]).await.unwrap();
    assert_eq!(
        get(&sandbox.store().await, "result.multiplier")
            .await
            .as_deref(),
        Some("0.8")
    );
}

#[tokio::test]
async fn test_reset_without_login_marks_stale_locally() {
    let sandbox = Sandbox::new();
    sandbox
        .run(&[
            "select",
            "--machine",
            "A",
            "--spindle",
            "B",
            "--material",
            "D",
            "--bit",
            "C",
            "--remember",
        ])
        .await
        .unwrap();

    sandbox.run(&["reset"]).await.unwrap();

    let store = sandbox.store().await;
    assert_eq!(get(&store, "selection.machine").await, None);
    assert_ne!(
        get(&store, "selection.remember").await.as_deref(),
        Some("true")
    );
    assert!(get(&store, "invalidation.token").await.is_some());
}

#[tokio::test]
async fn test_share_requires_login() {
    let sandbox = Sandbox::new();
    sandbox.run(&["adjust", "0.1", "--save"]).await.unwrap();

    assert!(sandbox.run(&["share"]).await.is_err());
}

#[tokio::test]
async fn test_login_then_logout_clears_everything() {
    let sandbox = Sandbox::new();
    sandbox.run(&["login", " secret "]).await.unwrap();
    assert_eq!(
        get(&sandbox.store().await, "auth.token").await.as_deref(),
        Some("secret")
    );

    sandbox.run(&["logout"]).await.unwrap();
    assert_eq!(get(&sandbox.store().await, "auth.token").await, None);
}

#[tokio::test]
async fn test_config_init_refuses_to_overwrite() {
    let sandbox = Sandbox::new();
    let fresh = sandbox.dir.path().join("nested").join("fresh.toml");
    let fresh_arg = fresh.to_str().unwrap().to_string();

    cli::run(Cli::try_parse_from(["feedkit", "--config", &fresh_arg, "config", "--init"]).unwrap())
        .await
        .unwrap();
    assert!(Path::new(&fresh).exists());

    let again =
        cli::run(Cli::try_parse_from(["feedkit", "--config", &fresh_arg, "config", "--init"]).unwrap())
            .await;
    assert!(again.is_err());
}
