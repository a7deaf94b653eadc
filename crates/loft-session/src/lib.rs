//! Session core for the Loft client.
//!
//! This crate owns the client's one session credential ("apikey") and every
//! transition around it: signing in, registering, re-validating a stored
//! key, account changes, and logout. Each transition pairs the backend call
//! with the local side effects that must happen with it - persisting the
//! key, pointing the shell at the right tab, refreshing the node tree and
//! activity feed - in a fixed order with defined rollback.
//!
//! Everything the core coordinates sits behind a small trait: [`Gateway`]
//! for backend transport, [`KeyStore`] for durable key storage, [`Shell`]
//! for the hosting UI, [`NodeStore`] and [`EventLog`] for the dependent
//! data modules. Hosts wire in the shipped backends ([`HttpGateway`],
//! [`FileKeyStore`], [`KeyringKeyStore`]) or their own.

pub mod api;
pub mod config;
pub mod modules;
pub mod session;
pub mod shell;

pub use api::{ApiError, Gateway, HttpGateway, Route};
pub use config::Config;
pub use modules::{EventLog, NodeStore};
pub use session::{
    Credentials, FileKeyStore, KeyStore, KeyringKeyStore, SessionError, SessionManager,
    SettingsChange,
};
pub use shell::{Shell, Tab};
