//! Pipeline entry points for watcher operations.
//!
//! - `run_cycle`: one fetch, filter, notify, mark pass
//! - `Watcher`: repeats cycles on a fixed interval until shut down
//! - `Shutdown`: latched stop request, fed by process signals

pub mod cycle;
pub mod schedule;
pub mod shutdown;

#[cfg(test)]
pub(crate) mod testing;

pub use cycle::run_cycle;
pub use schedule::Watcher;
pub use shutdown::{Shutdown, listen_for_signals};
