//! MythOS terminal front end
//!
//! Wires the core shell to a real terminal: the crossterm display adapter
//! and the boot sequence run by the `mythos` binary.

pub mod terminal;

pub use terminal::CrosstermTerminal;

use mythos_core::account::AccountStore;
use mythos_core::config::ShellConfig;
use mythos_core::error::Result;
use mythos_core::input::Terminal;
use mythos_core::session::establish_session;
use mythos_core::shell::{LogLevel, ShellLoop};
use tracing::info;

/// Create the namespace root and its command directories if missing
pub fn prepare_namespace(config: &ShellConfig) -> Result<()> {
    let root = config.namespace_path();
    std::fs::create_dir_all(&root)?;
    for dir in &config.search_paths {
        let path = dir
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(root.clone(), |path, segment| path.join(segment));
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Load the store, establish a session, then run the shell until `exit`.
/// Returns the process exit code.
pub async fn boot<T: Terminal + ?Sized>(term: &mut T, config: ShellConfig) -> Result<i32> {
    let mut store = AccountStore::load_or_init(config.account_path())?;
    prepare_namespace(&config)?;
    info!(
        "Booting MythOS v{} with {} account(s)",
        config.version,
        store.accounts().len()
    );

    let session = establish_session(term, &mut store, &config).await?;
    let mut shell = ShellLoop::with_config(session, config);
    shell.run(term).await
}

/// Exit status used when boot aborts on a fatal error
pub const FATAL_EXIT_STATUS: i32 = 2;

/// Console level and exit status for an error that ended the session.
/// Fatal errors (unreadable store, bad configuration) are told apart from
/// terminal or I/O failures.
pub fn failure_report(err: &anyhow::Error) -> (LogLevel, i32) {
    match err.downcast_ref::<mythos_core::Error>() {
        Some(e) if e.is_fatal() => (LogLevel::Fatal, FATAL_EXIT_STATUS),
        _ => (LogLevel::Error, 1),
    }
}
