//! Boot-time session establishment
//!
//! Runs the picker, login and account-creation flows until an account is
//! logged in.

use crate::account::{
    create_account, login, pick_account, AccountStore, CreateOutcome, LoginOutcome, PasswordPolicy,
    PickerEntry,
};
use crate::config::ShellConfig;
use crate::error::Result;
use crate::input::Terminal;
use crate::types::Rank;
use tracing::info;

/// The logged-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub index: usize,
    pub username: String,
    pub rank: Rank,
}

impl Session {
    fn from_store(store: &AccountStore, index: usize) -> Result<Self> {
        let account = store.account(index)?;
        Ok(Self {
            index,
            username: account.username.clone(),
            rank: account.rank,
        })
    }
}

/// Loop over picker, login and account creation until someone is logged in.
///
/// Escape from login returns to the picker on the same account; Escape from
/// account creation returns to the picker on "create new".
pub async fn establish_session<T: Terminal + ?Sized>(
    term: &mut T,
    store: &mut AccountStore,
    config: &ShellConfig,
) -> Result<Session> {
    let policy = PasswordPolicy::new(config.min_password_length);
    let mut start = store.current_index().map(PickerEntry::Account);

    loop {
        let entry = pick_account(term, store, &config.version, start).await?;
        start = Some(entry);

        let index = match entry {
            PickerEntry::CreateNew => match create_account(term, store, &config.version, policy).await? {
                CreateOutcome::Created(index) => index,
                CreateOutcome::Cancelled => continue,
            },
            PickerEntry::Account(index) => {
                match login(term, store, index, &config.version, config.max_login_attempts).await? {
                    LoginOutcome::LoggedIn => index,
                    LoginOutcome::Cancelled | LoginOutcome::LockedOut => continue,
                }
            }
        };

        let session = Session::from_store(store, index)?;
        info!("Session established for '{}' ({})", session.username, session.rank.label());
        return Ok(session);
    }
}
