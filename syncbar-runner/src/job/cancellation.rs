/// Why a run was cut short.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Someone asked for the sync to stop, normally `syncbar --stop`.
    StopRequested,
    /// The runner's terminal or session went away.
    Interrupted,
}

/// Termination signals, registered up front so a stop request arriving at
/// any point after the pid file is written gets routed through the runner
/// instead of killing it outright.
#[cfg(unix)]
#[derive(Debug)]
pub struct Signals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    pub fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Signals {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    pub async fn recv(&mut self) -> Reason {
        let reason = tokio::select! {
            _ = self.terminate.recv() => Reason::StopRequested,
            _ = self.interrupt.recv() => Reason::Interrupted,
            _ = self.hangup.recv() => Reason::Interrupted,
        };
        tracing::info!(?reason, "received termination signal");
        reason
    }
}

#[cfg(windows)]
#[derive(Debug)]
pub struct Signals {
    ctrl_c: tokio::signal::windows::CtrlC,
    ctrl_close: tokio::signal::windows::CtrlClose,
}

#[cfg(windows)]
impl Signals {
    pub fn register() -> std::io::Result<Self> {
        Ok(Signals {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
            ctrl_close: tokio::signal::windows::ctrl_close()?,
        })
    }

    pub async fn recv(&mut self) -> Reason {
        let reason = tokio::select! {
            _ = self.ctrl_c.recv() => Reason::Interrupted,
            _ = self.ctrl_close.recv() => Reason::StopRequested,
        };
        tracing::info!(?reason, "received termination signal");
        reason
    }
}
