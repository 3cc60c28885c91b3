//! Cancelable one-shot scheduling for auto-advance.
//!
//! Every armed timer is identified by a [`TimerTicket`] and guarded by a
//! [`CancellationToken`]. The token lives inside [`ArmedTimer`], which cancels it on
//! drop, so overwriting or clearing the stored timer always cancels the stale one.

use std::fmt;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Generation number of one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerTicket(u64);

impl TimerTicket {
    #[must_use]
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that can deliver a ticket back after a delay.
///
/// Implementations must not deliver the ticket once the returned token is cancelled.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, ticket: TimerTicket) -> CancellationToken;
}

/// Pending auto-advance; cancels itself when dropped
#[derive(Debug)]
pub struct ArmedTimer {
    ticket: TimerTicket,
    delay: Duration,
    token: CancellationToken,
}

impl ArmedTimer {
    /// Schedule a new timer through `scheduler`
    pub fn arm(scheduler: &dyn Scheduler, delay: Duration, ticket: TimerTicket) -> Self {
        let token = scheduler.schedule(delay, ticket);
        Self {
            ticket,
            delay,
            token,
        }
    }

    #[must_use]
    pub const fn ticket(&self) -> TimerTicket {
        self.ticket
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for ArmedTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Production scheduler: a tokio sleep per timer that reports back over a channel
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    fired_tx: mpsc::UnboundedSender<TimerTicket>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its expirations arrive on
    #[must_use]
    pub fn new(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<TimerTicket>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (Self { runtime, fired_tx }, fired_rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, ticket: TimerTicket) -> CancellationToken {
        let token = CancellationToken::new();
        let child = token.clone();
        let fired_tx = self.fired_tx.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                () = child.cancelled() => {
                    trace!("Auto-advance timer {ticket} cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    if !child.is_cancelled() {
                        let _ = fired_tx.send(ticket);
                    }
                }
            }
        });

        token
    }
}
