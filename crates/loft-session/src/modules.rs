//! Dependent data modules the session core keeps in step.
//!
//! The node tree and the activity feed each hold their own server-derived
//! state; the session core only tells them when the credential changed.
//! Refreshes are pass-through: failures bubble up to the session operation
//! that triggered them, nothing here retries or interprets.

use anyhow::Result;
use async_trait::async_trait;

/// The client's file-node tree.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Re-fetch the node tree for the current session.
    async fn update(&self) -> Result<()>;
}

/// The client's activity feed.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Re-fetch recent activity for the current session.
    async fn update(&self) -> Result<()>;

    /// Seed the feed for an account with no history yet. Runs alongside the
    /// first `update` after registration.
    async fn sync(&self) -> Result<()>;
}
