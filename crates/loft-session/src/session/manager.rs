//! Session state machine for the Loft client.
//!
//! `SessionManager` owns the one active session key and coordinates
//! everything that has to happen around a credential change: persisting the
//! key, pointing the shell at the right tab, and refreshing the node tree
//! and activity feed. No other part of the client holds credential state -
//! anything that needs the key reads it from here.
//!
//! Every operation runs its stages in a fixed order: backend call first,
//! then the credential commit, then navigation, then the fan-out refresh of
//! the dependent modules. Nothing downstream of the commit starts before
//! the commit lands, and a failed backend call leaves local state exactly
//! as it was.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::{Gateway, Route};
use crate::modules::{EventLog, NodeStore};
use crate::session::error::SessionError;
use crate::session::store::KeyStore;
use crate::shell::{Shell, Tab};

/// Login/registration form payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Requested account changes. `None` fields are left untouched server-side.
#[derive(Debug, Clone, Default)]
pub struct SettingsChange {
    pub current_password: String,
    pub new_username: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize)]
struct KeyGrant {
    apikey: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRequest<'a> {
    apikey: &'a str,
    current_password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_password: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteAccountRequest<'a> {
    apikey: &'a str,
    password: &'a str,
}

/// The client's session credential and the transitions around it.
///
/// Two logical states: Authenticated (key present) and Unauthenticated
/// (key absent). Credential-mutating operations take `&mut self`, so two
/// of them cannot interleave on one instance; across instances the last
/// write to the store wins.
pub struct SessionManager {
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn KeyStore>,
    nodes: Arc<dyn NodeStore>,
    events: Arc<dyn EventLog>,
    shell: Arc<dyn Shell>,
    apikey: Option<String>,
}

impl SessionManager {
    /// Create a manager, restoring any key the store already holds.
    ///
    /// A restored key counts as Authenticated as-is; it is only checked
    /// against the backend when [`validate_key`](Self::validate_key) runs.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        store: Arc<dyn KeyStore>,
        nodes: Arc<dyn NodeStore>,
        events: Arc<dyn EventLog>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        let apikey = match store.load() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session key");
                None
            }
        };
        if apikey.is_some() {
            debug!("Restored session key from store");
        }

        Self {
            gateway,
            store,
            nodes,
            events,
            shell,
            apikey,
        }
    }

    /// The active session key, if signed in.
    pub fn apikey(&self) -> Option<&str> {
        self.apikey.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.apikey.is_some()
    }

    /// Authenticate and bring the client into the signed-in state.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        let payload = self
            .gateway
            .fetch(Route::Login, serde_json::to_value(credentials)?)
            .await?;
        let grant: KeyGrant = serde_json::from_value(payload)?;

        self.commit_key(grant.apikey);
        self.shell.set_active_tab(Tab::Home);
        info!("Signed in");

        self.refresh_modules(false).await
    }

    /// Create an account, then bring the client into the signed-in state.
    ///
    /// A fresh account has no activity history yet, so the event log is
    /// seeded alongside the first refresh.
    pub async fn register(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        let payload = self
            .gateway
            .fetch(Route::Register, serde_json::to_value(credentials)?)
            .await?;
        let grant: KeyGrant = serde_json::from_value(payload)?;

        self.commit_key(grant.apikey);
        self.shell.set_active_tab(Tab::Home);
        info!("Account created, signed in");

        self.refresh_modules(true).await
    }

    /// Confirm a previously stored key with the backend.
    ///
    /// Read-only against the backend: it grants nothing, it only confirms.
    /// The key is assumed to already sit in the durable store (that is
    /// where it was restored from), so only the in-memory copy is set. A
    /// rejected key triggers a full logout before the error is returned -
    /// a dead session is never left active or persisted.
    pub async fn validate_key(&mut self, apikey: &str) -> Result<(), SessionError> {
        match self
            .gateway
            .fetch(Route::CheckApiKey, json!({ "apikey": apikey }))
            .await
        {
            Ok(_) => {
                self.apikey = Some(apikey.to_string());
                debug!("Stored session key confirmed");
                self.refresh_modules(false).await
            }
            Err(err) => {
                info!(error = %err, "Stored session key rejected, signing out");
                self.logout();
                Err(SessionError::StaleKey(err))
            }
        }
    }

    /// Change username and/or password. Requires being signed in.
    ///
    /// The backend invalidates the session key on success, so this always
    /// ends in a logout; the user re-authenticates with the new
    /// credentials.
    pub async fn apply_settings(&mut self, change: &SettingsChange) -> Result<(), SessionError> {
        let apikey = self.apikey.as_deref().ok_or(SessionError::NotAuthenticated)?;
        let request = SettingsRequest {
            apikey,
            current_password: &change.current_password,
            new_username: change.new_username.as_deref(),
            new_password: change.new_password.as_deref(),
        };

        self.gateway
            .fetch(Route::Settings, serde_json::to_value(&request)?)
            .await?;

        self.logout();
        Ok(())
    }

    /// Delete the account and everything stored under it. Requires being
    /// signed in.
    pub async fn delete_account(&mut self, password: &str) -> Result<(), SessionError> {
        let apikey = self.apikey.as_deref().ok_or(SessionError::NotAuthenticated)?;
        let request = DeleteAccountRequest { apikey, password };

        self.gateway
            .fetch(Route::DeleteAccount, serde_json::to_value(&request)?)
            .await?;

        self.logout();
        Ok(())
    }

    /// Drop the session: clear the key from memory and the durable store,
    /// then tell the shell the session is over.
    ///
    /// Safe to call while already signed out; the end state is the same.
    pub fn logout(&mut self) {
        self.apikey = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session key");
        }
        self.shell.session_ended();
        info!("Session ended");
    }

    /// Persist the key, then publish it in memory. Readers of `apikey()`
    /// never see a key the store was not given first.
    fn commit_key(&mut self, apikey: String) {
        if let Err(e) = self.store.save(&apikey) {
            warn!(error = %e, "Failed to persist session key");
        }
        self.apikey = Some(apikey);
    }

    /// Fan out to the dependent data modules and wait for all of them.
    ///
    /// Every refresh runs to completion even when a sibling fails; the
    /// first failure is what the caller sees. The committed key is not
    /// rolled back on failure here - the session is valid, only auxiliary
    /// data is behind.
    async fn refresh_modules(&self, seed_events: bool) -> Result<(), SessionError> {
        let results = if seed_events {
            let (seed, nodes, events) = tokio::join!(
                self.events.sync(),
                self.nodes.update(),
                self.events.update()
            );
            vec![seed, nodes, events]
        } else {
            let (nodes, events) = tokio::join!(self.nodes.update(), self.events.update());
            vec![nodes, events]
        };

        for result in results {
            if let Err(err) = result {
                warn!(error = %err, "Module refresh failed after sign-in");
                return Err(SessionError::Refresh(err));
            }
        }
        Ok(())
    }
}
