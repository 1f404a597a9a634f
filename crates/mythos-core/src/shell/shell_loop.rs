//! The interactive read-dispatch loop

use super::builtins::{BuiltinKind, BuiltinRegistry};
use super::command::{CommandResolver, CommandRunner, Invocation, ProcessRunner, SearchPathResolver};
use super::console::{log, LogLevel};
use crate::access::{AccessController, OpenOutcome};
use crate::config::ShellConfig;
use crate::error::{CommandError, Error, NamespaceError, Result};
use crate::input::{clear_screen, LineEditor, ReadOutcome, Style, Terminal};
use crate::namespace::{FsNamespace, Namespace, Navigator};
use crate::session::Session;
use crate::types::{AccessMode, Resource};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    /// Rendering the prompt
    Prompting,
    /// Waiting for the command line
    AwaitingCommand,
    /// Running a builtin or external command
    Dispatching,
}

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Split a command line into its name and arguments. `None` for a blank
/// line.
pub fn parse_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut words = line.split_whitespace().map(str::to_string);
    let name = words.next()?;
    Some((name, words.collect()))
}

pub struct ShellLoop {
    session: Session,
    config: ShellConfig,
    namespace: Box<dyn Namespace>,
    resolver: Box<dyn CommandResolver>,
    runner: Box<dyn CommandRunner>,
    navigator: Navigator,
    builtins: BuiltinRegistry,
    state: ShellState,
}

impl ShellLoop {
    pub fn new(
        session: Session,
        config: ShellConfig,
        namespace: Box<dyn Namespace>,
        resolver: Box<dyn CommandResolver>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            session,
            config,
            namespace,
            resolver,
            runner,
            navigator: Navigator::new(),
            builtins: BuiltinRegistry::default(),
            state: ShellState::Prompting,
        }
    }

    /// Shell over the configured namespace directory, running external
    /// commands as child processes
    pub fn with_config(session: Session, config: ShellConfig) -> Self {
        let root = config.namespace_path();
        let resolver = SearchPathResolver::new(&root, config.search_paths.clone());
        Self::new(
            session,
            config,
            Box::new(FsNamespace::new(root)),
            Box::new(resolver),
            Box::new(ProcessRunner),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn prompt(&self) -> String {
        format!("{} % ", self.navigator.current_path())
    }

    /// Run until `exit`, returning the exit code
    pub async fn run<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<i32> {
        info!("Shell started for '{}'", self.session.username);
        clear_screen(term, &self.config.version)?;

        loop {
            if let Flow::Exit(code) = self.step(term).await? {
                info!("Shell exited with code {}", code);
                return Ok(code);
            }
        }
    }

    /// Read and dispatch one command line
    pub async fn step<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<Flow> {
        self.state = ShellState::Prompting;
        let editor = LineEditor::new(self.prompt());

        self.state = ShellState::AwaitingCommand;
        let line = match editor.read(term).await? {
            ReadOutcome::Submitted(line) => line,
            ReadOutcome::Cancelled => {
                self.state = ShellState::Prompting;
                return Ok(Flow::Continue);
            }
        };

        let Some((name, args)) = parse_command(&line) else {
            self.state = ShellState::Prompting;
            return Ok(Flow::Continue);
        };

        self.state = ShellState::Dispatching;
        let flow = self.dispatch(term, &name, &args).await;
        self.state = ShellState::Prompting;

        let flow = flow?;
        if flow == Flow::Continue {
            term.write("\n")?;
        }
        Ok(flow)
    }

    async fn dispatch<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        name: &str,
        args: &[String],
    ) -> Result<Flow> {
        let Some(builtin) = self.builtins.get(name).copied() else {
            self.run_external(term, name, args).await?;
            return Ok(Flow::Continue);
        };

        debug!("Builtin: {} {:?}", name, args);
        if let Some(warning) = builtin.arity.check(args) {
            log(term, LogLevel::Warn, &warning)?;
        }

        match builtin.kind {
            BuiltinKind::Cd => self.cd(term, args.first().map(String::as_str)).await?,
            BuiltinKind::Ls => self.ls(term, args.first().map(String::as_str)).await?,
            BuiltinKind::Exit => return Ok(Flow::Exit(0)),
        }
        Ok(Flow::Continue)
    }

    async fn cd<T: Terminal + ?Sized>(&mut self, term: &mut T, path: Option<&str>) -> Result<()> {
        let result = match path {
            Some(path) => {
                self.navigator
                    .change_directory(self.namespace.as_ref(), path)
                    .await
            }
            None => Err(NamespaceError::NotADirectory(String::new()).into()),
        };
        report_namespace_error(term, result)
    }

    async fn ls<T: Terminal + ?Sized>(&mut self, term: &mut T, path: Option<&str>) -> Result<()> {
        let entries = match self.navigator.list(self.namespace.as_ref(), path).await {
            Ok(entries) => entries,
            Err(e) => return report_namespace_error(term, Err(e)),
        };

        for entry in entries {
            if entry.is_dir {
                term.write_styled(&entry.name, Style::Directory)?;
            } else {
                term.write(&entry.name)?;
            }
            term.write("\n")?;
        }
        Ok(())
    }

    async fn run_external<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        name: &str,
        args: &[String],
    ) -> Result<()> {
        let resource = Resource::runnable(name, self.config.permission_for(name)?);
        let program = match AccessController::open(
            &resource,
            self.session.rank,
            AccessMode::READ,
            self.resolver.as_ref(),
        ) {
            OpenOutcome::Runnable(program) => program,
            OpenOutcome::Denied => {
                return log(term, LogLevel::Error, &format!("access denied: {}", name));
            }
            OpenOutcome::NotFound | OpenOutcome::Data => {
                return log(term, LogLevel::Warn, &format!("Unknown command: {}", name));
            }
        };

        let invocation = Invocation {
            name: name.to_string(),
            program,
            args: args.to_vec(),
            working_dir: self.navigator.host_path(self.namespace.as_ref()),
            env: vec![
                ("MYTHOS_CWD".to_string(), self.navigator.current_path()),
                ("MYTHOS_USER".to_string(), self.session.username.clone()),
            ],
        };

        term.suspend()?;
        let result = self.runner.run(&invocation).await;
        term.resume()?;

        match result {
            Ok(()) => Ok(()),
            Err(Error::Command(CommandError::EarlyExit)) => {
                debug!("'{}' returned early", name);
                Ok(())
            }
            Err(Error::Command(e)) => log(term, LogLevel::Warn, &e.to_string()),
            Err(e) => Err(e),
        }
    }
}

/// Show namespace and I/O errors from `cd`/`ls` at the prompt; anything
/// else propagates
fn report_namespace_error<T: Terminal + ?Sized>(term: &mut T, result: Result<()>) -> Result<()> {
    match result {
        Err(Error::Namespace(e)) => log(term, LogLevel::Error, &e.to_string()),
        Err(Error::Io(e)) => log(term, LogLevel::Error, &e.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PermissionSpec;
    use crate::shell::{MockCommandResolver, MockCommandRunner};
    use crate::testing::ScriptedTerminal;
    use crate::types::Rank;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn alice() -> Session {
        Session {
            index: 0,
            username: "alice".to_string(),
            rank: Rank::User,
        }
    }

    /// root/{a/{c}, B, exe/hello, notes.txt}
    fn tree() -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/c")).unwrap();
        std::fs::create_dir_all(dir.path().join("B")).unwrap();
        std::fs::create_dir_all(dir.path().join("exe")).unwrap();
        std::fs::write(dir.path().join("exe/hello"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        dir
    }

    fn shell(
        dir: &TempDir,
        config: ShellConfig,
        resolver: MockCommandResolver,
        runner: MockCommandRunner,
    ) -> ShellLoop {
        ShellLoop::new(
            alice(),
            config,
            Box::new(FsNamespace::new(dir.path())),
            Box::new(resolver),
            Box::new(runner),
        )
    }

    fn plain_shell(dir: &TempDir) -> ShellLoop {
        shell(
            dir,
            ShellConfig::default(),
            MockCommandResolver::new(),
            MockCommandRunner::new(),
        )
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   \t "), None);
        assert_eq!(parse_command("ls"), Some(("ls".to_string(), vec![])));
        assert_eq!(
            parse_command("  cd   a/b  extra "),
            Some(("cd".to_string(), vec!["a/b".to_string(), "extra".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_exit_returns_zero() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("exit");

        assert_eq!(sh.run(&mut term).await.unwrap(), 0);
        assert!(term.output().contains("root % exit"));
        assert_eq!(sh.state(), ShellState::Prompting);
    }

    #[tokio::test]
    async fn test_exit_with_args_warns_and_still_exits() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("exit now");

        assert_eq!(sh.run(&mut term).await.unwrap(), 0);
        assert!(term.output().contains("[WARN]: Arguments after 'now' will be ignored"));
    }

    #[tokio::test]
    async fn test_blank_and_cancelled_lines_are_noops() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("   ");
        term.type_text("ls");
        term.push_key(crate::input::Key::Escape);

        assert_eq!(sh.step(&mut term).await.unwrap(), Flow::Continue);
        assert_eq!(sh.step(&mut term).await.unwrap(), Flow::Continue);
        assert_eq!(term.remaining_keys(), 0);
        assert!(!term.output().contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_cd_updates_prompt() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd a/c");
        term.type_line("cd ..");
        term.type_line("exit");

        sh.run(&mut term).await.unwrap();
        assert!(term.output().contains("root/a/c % cd .."));
        assert!(term.output().contains("root/a % exit"));
        assert_eq!(sh.navigator().current_path(), "root/a");
    }

    #[tokio::test]
    async fn test_cd_partial_failure_reports_segment() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd a/missing");

        assert_eq!(sh.step(&mut term).await.unwrap(), Flow::Continue);
        assert!(term.output().contains("[ERROR]: not a directory: 'missing'"));
        assert_eq!(sh.prompt(), "root/a % ");
    }

    #[tokio::test]
    async fn test_cd_without_argument() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd");

        sh.step(&mut term).await.unwrap();
        assert!(term.output().contains("[ERROR]: not a directory: ''"));
        assert!(sh.navigator().is_at_root());
    }

    #[tokio::test]
    async fn test_cd_extra_args_warns_and_uses_first() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd a B");

        sh.step(&mut term).await.unwrap();
        assert!(term.output().contains("[WARN]: Arguments after 'a' will be ignored"));
        assert_eq!(sh.navigator().current_path(), "root/a");
    }

    #[tokio::test]
    async fn test_ls_lists_directories_first() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("ls");

        sh.step(&mut term).await.unwrap();
        let listing: Vec<&str> = term.output().lines().skip(1).collect();
        assert_eq!(listing, vec!["a", "B", "exe", "notes.txt", ""]);
        assert_eq!(
            term.styled().to_vec(),
            vec![
                ("a".to_string(), Style::Directory),
                ("B".to_string(), Style::Directory),
                ("exe".to_string(), Style::Directory),
            ]
        );
    }

    #[tokio::test]
    async fn test_ls_path_is_relative_to_cwd() {
        let dir = tree();
        let mut sh = plain_shell(&dir);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd a");
        term.type_line("ls c");
        term.type_line("ls notes.txt");

        sh.step(&mut term).await.unwrap();
        sh.step(&mut term).await.unwrap();
        sh.step(&mut term).await.unwrap();
        assert!(!term.output().contains("[ERROR]: not a directory: 'c'"));
        assert!(term.output().contains("[ERROR]: not a directory: 'notes.txt'"));
        assert_eq!(sh.navigator().current_path(), "root/a");
    }

    #[tokio::test]
    async fn test_unknown_command_warns() {
        let dir = tree();
        let mut resolver = MockCommandResolver::new();
        resolver
            .expect_resolve()
            .withf(|name| name == "frob")
            .times(1)
            .returning(|_| None);
        let mut sh = shell(&dir, ShellConfig::default(), resolver, MockCommandRunner::new());
        let mut term = ScriptedTerminal::new();
        term.type_line("frob");

        assert_eq!(sh.step(&mut term).await.unwrap(), Flow::Continue);
        assert!(term.output().contains("[WARN]: Unknown command: frob"));
    }

    #[tokio::test]
    async fn test_denied_command_is_not_resolved() {
        let dir = tree();
        let mut config = ShellConfig::default();
        config.permissions.insert(
            "hello".to_string(),
            PermissionSpec {
                user: Some(vec![]),
                ..PermissionSpec::default()
            },
        );
        let mut resolver = MockCommandResolver::new();
        resolver.expect_resolve().times(0);
        let mut sh = shell(&dir, config, resolver, MockCommandRunner::new());
        let mut term = ScriptedTerminal::new();
        term.type_line("hello");

        sh.step(&mut term).await.unwrap();
        assert!(term.output().contains("[ERROR]: access denied: hello"));
        assert_eq!(term.suspend_count(), 0);
    }

    #[tokio::test]
    async fn test_external_command_invocation() {
        let dir = tree();
        let program = dir.path().join("exe/hello");
        let expected = Invocation {
            name: "hello".to_string(),
            program: program.clone(),
            args: vec!["world".to_string()],
            working_dir: Some(dir.path().join("a")),
            env: vec![
                ("MYTHOS_CWD".to_string(), "root/a".to_string()),
                ("MYTHOS_USER".to_string(), "alice".to_string()),
            ],
        };

        let mut resolver = MockCommandResolver::new();
        resolver
            .expect_resolve()
            .returning(move |_| Some(program.clone()));
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(move |invocation| *invocation == expected)
            .times(1)
            .returning(|_| Ok(()));

        let mut sh = shell(&dir, ShellConfig::default(), resolver, runner);
        let mut term = ScriptedTerminal::new();
        term.type_line("cd a");
        term.type_line("hello world");

        sh.step(&mut term).await.unwrap();
        sh.step(&mut term).await.unwrap();
        assert_eq!(term.suspend_count(), 1);
    }

    #[tokio::test]
    async fn test_early_exit_returns_to_prompt() {
        let dir = tree();
        let mut resolver = MockCommandResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Some(PathBuf::from("/bin/true")));
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| Err(Error::Command(CommandError::EarlyExit)));

        let mut sh = shell(&dir, ShellConfig::default(), resolver, runner);
        let mut term = ScriptedTerminal::new();
        term.type_line("hello");
        term.type_line("exit");

        assert_eq!(sh.run(&mut term).await.unwrap(), 0);
        assert!(!term.output().contains("[WARN]"));
    }

    #[tokio::test]
    async fn test_failed_command_warns_and_continues() {
        let dir = tree();
        let mut resolver = MockCommandResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Some(PathBuf::from("/bin/false")));
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| {
            Err(Error::Command(CommandError::Failed {
                name: "hello".to_string(),
                code: 1,
            }))
        });

        let mut sh = shell(&dir, ShellConfig::default(), resolver, runner);
        let mut term = ScriptedTerminal::new();
        term.type_line("hello");
        term.type_line("exit");

        assert_eq!(sh.run(&mut term).await.unwrap(), 0);
        assert!(term
            .output()
            .contains("[WARN]: Command 'hello' exited with status 1"));
    }

    /// Has one directory, `locked`, whose listing always fails
    struct LockedNamespace;

    #[async_trait::async_trait]
    impl Namespace for LockedNamespace {
        async fn is_dir(&self, path: &[String]) -> Result<bool> {
            Ok(path.len() == 1 && path[0] == "locked")
        }

        async fn list(&self, _path: &[String]) -> Result<Vec<crate::types::Entry>> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported_and_loop_continues() {
        let mut sh = ShellLoop::new(
            alice(),
            ShellConfig::default(),
            Box::new(LockedNamespace),
            Box::new(MockCommandResolver::new()),
            Box::new(MockCommandRunner::new()),
        );
        let mut term = ScriptedTerminal::new();
        term.type_line("ls locked");
        term.type_line("exit");

        assert_eq!(sh.run(&mut term).await.unwrap(), 0);
        assert_eq!(term.remaining_keys(), 0);
        assert!(term.output().contains("[ERROR]: "));
        assert!(term.output().contains("root % exit"));
    }
}

