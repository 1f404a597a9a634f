//! End-to-end boot: account creation, reboot, login and the first prompt

use mythos_cli::boot;
use mythos_core::config::ShellConfig;
use mythos_core::input::{Key, Style};
use mythos_core::testing::ScriptedTerminal;
use mythos_core::types::PasswordDigest;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_create_then_reboot_and_login() {
    let dir = tempdir().unwrap();

    // First boot: empty store goes straight to "create new"
    let config = ShellConfig::load(dir.path()).unwrap();
    let mut term = ScriptedTerminal::new();
    term.push_key(Key::Enter);
    term.type_line("alice");
    term.type_line("secret!1");
    term.type_line("exit");

    assert_eq!(boot(&mut term, config).await.unwrap(), 0);
    assert_eq!(term.remaining_keys(), 0);

    let content = std::fs::read_to_string(dir.path().join("account_data.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        stored,
        json!({
            "current": 0,
            "all": [{
                "username": "alice",
                "password": PasswordDigest::of("secret!1").as_str(),
            }],
        })
    );

    // Reboot: alice is highlighted and logs in
    let config = ShellConfig::load(dir.path()).unwrap();
    let mut term = ScriptedTerminal::new();
    term.push_key(Key::Enter);
    term.type_line("secret!1");
    term.type_line("exit");

    assert_eq!(boot(&mut term, config).await.unwrap(), 0);
    assert_eq!(term.styled()[0], ("alice".to_string(), Style::Highlight));
    assert!(term.output().contains("Hi, alice"));
    assert!(term.screen().contains("root % exit"));
    assert!(!term.output().contains("secret!1"));
}

#[tokio::test]
async fn test_wrong_password_reprompts() {
    let dir = tempdir().unwrap();
    let mut term = ScriptedTerminal::new();
    term.push_key(Key::Enter);
    term.type_line("bob");
    term.type_line("hunter2!!");
    term.type_line("exit");
    boot(&mut term, ShellConfig::load(dir.path()).unwrap())
        .await
        .unwrap();

    let mut term = ScriptedTerminal::new();
    term.push_key(Key::Enter);
    term.type_line("wrong");
    term.type_line("hunter2!!");
    term.type_line("exit");

    assert_eq!(
        boot(&mut term, ShellConfig::load(dir.path()).unwrap())
            .await
            .unwrap(),
        0
    );
    assert!(term.output().contains("Incorrect password"));
}

#[tokio::test]
async fn test_corrupt_store_aborts_boot() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("account_data.json"), "{ not json").unwrap();

    let mut term = ScriptedTerminal::new();
    let err = boot(&mut term, ShellConfig::load(dir.path()).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(term.clear_count(), 0);
}

#[tokio::test]
async fn test_shell_runs_in_namespace_tree() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("root/home")).unwrap();

    let mut term = ScriptedTerminal::new();
    term.push_key(Key::Enter);
    term.type_line("carol");
    term.type_line("p4ssword?");
    term.type_line("ls");
    term.type_line("cd home");
    term.type_line("exit");

    assert_eq!(
        boot(&mut term, ShellConfig::load(dir.path()).unwrap())
            .await
            .unwrap(),
        0
    );
    assert!(term.styled().contains(&("home".to_string(), Style::Directory)));
    assert!(term.styled().contains(&("exe".to_string(), Style::Directory)));
    assert!(term.output().contains("root/home % exit"));
}
