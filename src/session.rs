// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::{Result, TallyError};
use crate::ledger::LedgerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Login state for one invocation. This is a plain shared-secret check, not a
/// security boundary.
#[derive(Debug, Clone)]
pub struct Session {
    passphrase: Option<String>,
    state: AuthState,
}

impl Session {
    /// Without a configured passphrase there is nothing to check and the
    /// session starts authenticated.
    pub fn new(passphrase: Option<String>) -> Self {
        let state = if passphrase.is_some() {
            AuthState::Anonymous
        } else {
            AuthState::Authenticated
        };
        Session { passphrase, state }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn login(&mut self, attempt: &str) -> Result<()> {
        match &self.passphrase {
            Some(secret) if secret != attempt => {
                Err(TallyError::Auth("incorrect password".into()))
            }
            _ => {
                self.state = AuthState::Authenticated;
                Ok(())
            }
        }
    }

    pub fn require_authenticated(&self) -> Result<()> {
        match self.state {
            AuthState::Authenticated => Ok(()),
            AuthState::Anonymous => Err(TallyError::Auth(
                "password required (use --password or TALLYBOOK_PASSWORD)".into(),
            )),
        }
    }
}

/// Everything a command handler needs: resolved settings, the login state,
/// and the user's ledgers behind it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    store: LedgerStore,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let store = LedgerStore::new(&config.data_dir, &config.user);
        let session = Session::new(config.passphrase.clone());
        AppContext {
            config,
            session,
            store,
        }
    }

    /// The user's ledgers, available only once the session is authenticated.
    pub fn ledger(&self) -> Result<&LedgerStore> {
        self.session.require_authenticated()?;
        Ok(&self.store)
    }
}
