// src/pipeline/shutdown.rs

//! Shutdown requests for [`Watcher::serve`](crate::pipeline::Watcher::serve).
//!
//! A request is latched: one made while a cycle is running is seen as soon
//! as that cycle ends.

use tokio::sync::watch;

/// Sending half; requests shutdown.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half; resolves once shutdown has been requested.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Create a connected trigger and listener.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Shutdown {
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for a request. Never resolves if the trigger is dropped unfired.
    pub async fn wait(mut self) {
        if self.rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Install Ctrl+C and SIGTERM handlers now and return their listener.
///
/// Handlers are registered before this returns, so a signal arriving
/// during the first cycle is caught instead of killing the process.
pub fn listen_for_signals() -> std::io::Result<Shutdown> {
    let (trigger, shutdown) = channel();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => log::info!("Received SIGTERM"),
                _ = sigint.recv() => log::info!("Received Ctrl+C"),
            }
            trigger.trigger();
        });
    }

    #[cfg(windows)]
    {
        let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
        tokio::spawn(async move {
            ctrl_c.recv().await;
            log::info!("Received Ctrl+C");
            trigger.trigger();
        });
    }

    Ok(shutdown)
}
