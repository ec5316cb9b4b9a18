// src/signals.rs

//! External shutdown request handling.
//!
//! The supervisor never reacts to a signal directly: listener tasks set a
//! process-wide atomic flag, and the polling loop inspects it at the top of
//! each iteration. The flag is only ever set, never cleared.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

/// Process-wide "stop everything" flag. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spawn the listener tasks: SIGHUP and Ctrl-C both request shutdown.
///
/// Must be called from within the Tokio runtime.
pub fn install_listeners(flag: &ShutdownFlag) -> std::io::Result<()> {
    let mut hangup = signal(SignalKind::hangup())?;
    let hup_flag = flag.clone();
    tokio::spawn(async move {
        if hangup.recv().await.is_some() {
            info!("SIGHUP received; requesting shutdown");
            hup_flag.set();
        }
    });

    let int_flag = flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; requesting shutdown");
            int_flag.set();
        }
    });

    Ok(())
}
