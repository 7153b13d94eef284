//! # Tree Head Follower
//!
//! Background task feeding the store's tree head notifications into
//! [`LogLookup::on_new_sth`].

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::service::LogLookup;
use crate::ports::ReadOnlyLogStore;

impl<S: ReadOnlyLogStore + 'static> LogLookup<S> {
    /// Follow the store's tree heads until `shutdown` flips to `true` or the
    /// store closes its notification channel.
    ///
    /// Subscribes before returning and then catches up once, so heads
    /// published between bootstrap and this call are not missed. Failed
    /// refreshes, including a failed catch-up, are logged and counted by the
    /// engine and retried on the next head.
    pub fn spawn_follower(self: &Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let mut heads = engine.store().subscribe_tree_heads();

        tokio::spawn(async move {
            let _ = engine.catch_up().await;

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("[tl-lookup] Shutdown signal received");
                            break;
                        }
                    }
                    received = heads.recv() => match received {
                        Ok(sth) => {
                            let _ = engine.on_new_sth(sth).await;
                        }
                        Err(RecvError::Lagged(count)) => {
                            // Older heads were dropped; the next one received
                            // supersedes them.
                            debug!(lagged = count, "[tl-lookup] Tree head receiver lagged");
                        }
                        Err(RecvError::Closed) => {
                            info!("[tl-lookup] Tree head channel closed");
                            break;
                        }
                    },
                }
            }
        })
    }
}
