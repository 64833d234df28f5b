//! Command implementations.

pub mod cluster;
pub mod graph;
pub mod link;
pub mod neighborhood;
pub mod outcome;
pub mod record;
pub mod search;
pub mod similar;

pub use self::cluster::execute_cluster;
pub use self::graph::execute_graph;
pub use self::link::execute_link;
pub use self::neighborhood::execute_neighborhood;
pub use self::outcome::execute_outcome;
pub use self::record::execute_record;
pub use self::search::execute_search;
pub use self::similar::execute_similar;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::warn;

/// Cancellation token tripped by Ctrl-C while it is alive.
///
/// Dropping it stops listening for the signal.
pub struct Interrupt {
    token: CancellationToken,
    _stop: DropGuard,
}

impl Interrupt {
    /// Start listening for Ctrl-C.
    pub fn listen() -> Self {
        let token = CancellationToken::new();
        let stop = CancellationToken::new();

        let cancel = token.clone();
        let stopped = stop.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = stopped.cancelled() => {}
                result = tokio::signal::ctrl_c() => {
                    if result.is_ok() {
                        warn!("interrupt received, keeping results found so far");
                        cancel.cancel();
                    }
                }
            }
        });

        Self {
            token,
            _stop: stop.drop_guard(),
        }
    }

    /// The token long-running work should watch.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
