//! Login and account creation

use super::{check_username, AccountStore, PasswordPolicy};
use crate::error::Result;
use crate::input::{clear_screen, Echo, LineEditor, ReadOutcome, Terminal};
use crate::types::PasswordDigest;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// Escape at the password prompt
    Cancelled,
    /// The attempt cap was reached
    LockedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(usize),
    /// Escape at the username prompt
    Cancelled,
}

/// Prompt for the password of account `index` until it matches, the user
/// escapes, or `max_attempts` wrong passwords have been entered.
pub async fn login<T: Terminal + ?Sized>(
    term: &mut T,
    store: &mut AccountStore,
    index: usize,
    version: &str,
    max_attempts: Option<u32>,
) -> Result<LoginOutcome> {
    let username = store.account(index)?.username.clone();
    let editor = LineEditor::new("Enter your password: ").echo(Echo::Hidden);
    let mut attempts = 0u32;

    loop {
        clear_screen(term, version)?;
        term.write(&format!("Hi, {}\n", username))?;
        if attempts > 0 {
            term.write("Incorrect password\n")?;
        }

        let digest = match editor.read_with(term, |p| PasswordDigest::of(&p)).await? {
            ReadOutcome::Submitted(digest) => digest,
            ReadOutcome::Cancelled => return Ok(LoginOutcome::Cancelled),
        };

        if store.verify(index, &digest)? {
            store.record_login(index)?;
            info!("Logged in as '{}'", username);
            return Ok(LoginOutcome::LoggedIn);
        }

        attempts += 1;
        warn!("Incorrect password for '{}' (attempt {})", username, attempts);

        if max_attempts.is_some_and(|max| attempts >= max) {
            warn!("Login locked out for '{}' after {} attempts", username, attempts);
            return Ok(LoginOutcome::LockedOut);
        }
    }
}

/// Register a new account. Escape at the password prompt goes back to the
/// username prompt; Escape at the username prompt abandons creation.
pub async fn create_account<T: Terminal + ?Sized>(
    term: &mut T,
    store: &mut AccountStore,
    version: &str,
    policy: PasswordPolicy,
) -> Result<CreateOutcome> {
    loop {
        clear_screen(term, version)?;

        let username = {
            let accounts = store.accounts();
            let editor = LineEditor::new("Enter a username: ")
                .validate(move |name| check_username(accounts, name));
            match editor.read(term).await? {
                ReadOutcome::Submitted(name) => name,
                ReadOutcome::Cancelled => return Ok(CreateOutcome::Cancelled),
            }
        };

        let editor = LineEditor::new("Enter a password: ")
            .echo(Echo::Masked('*'))
            .validate(move |password| policy.check(password));
        let digest = match editor.read_with(term, |p| PasswordDigest::of(&p)).await? {
            ReadOutcome::Submitted(digest) => digest,
            ReadOutcome::Cancelled => continue,
        };

        let index = store.create_account(username, digest)?;
        return Ok(CreateOutcome::Created(index));
    }
}
