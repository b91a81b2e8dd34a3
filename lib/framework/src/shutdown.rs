use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::oneshot;

/// Held by whoever owns the lifetime of a source. Cancelling it, or
/// dropping it, tells every clone of the paired [`ShutdownSignal`] to
/// begin shutting down.
#[derive(Debug)]
pub struct Trigger {
    tx: Option<oneshot::Sender<()>>,
}

impl Trigger {
    pub fn cancel(mut self) {
        if let Some(tx) = self.tx.take() {
            // the receiving side may be gone already, which is fine
            let _ = tx.send(());
        }
    }
}

/// Passed to each Source to coordinate the shutdown process.
///
/// Resolves once the paired [`Trigger`] is cancelled or dropped, and keeps
/// resolving immediately from then on, so it is safe to poll it in a
/// `select!` loop after completion.
#[derive(Clone)]
pub struct ShutdownSignal {
    begin: Shared<BoxFuture<'static, ()>>,
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let done = self.begin.poll_unpin(cx);
        if done.is_ready() {
            debug!(message = "shutdown signal ready");
        }

        done
    }
}

impl ShutdownSignal {
    pub fn new() -> (Trigger, ShutdownSignal) {
        let (tx, rx) = oneshot::channel::<()>();

        (
            Trigger { tx: Some(tx) },
            ShutdownSignal {
                // Err means the trigger was dropped without cancel, which
                // is treated as shutdown too.
                begin: rx.map(|_| ()).boxed().shared(),
            },
        )
    }

    /// A signal that never fires.
    pub fn noop() -> Self {
        Self {
            begin: futures::future::pending().boxed().shared(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn cancel_wakes_all_clones() {
        let (trigger, signal) = ShutdownSignal::new();
        let other = signal.clone();

        assert!(futures::poll!(signal.clone()).is_pending());

        trigger.cancel();

        signal.await;
        other.await;
    }

    #[tokio::test]
    async fn drop_trigger_is_shutdown() {
        let (trigger, signal) = ShutdownSignal::new();
        drop(trigger);

        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ready_after_completion() {
        let (trigger, mut signal) = ShutdownSignal::new();
        trigger.cancel();

        (&mut signal).await;
        assert!(futures::poll!(&mut signal).is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn noop_never_fires() {
        let signal = ShutdownSignal::noop();

        let result = tokio::time::timeout(Duration::from_secs(10), signal).await;
        assert!(result.is_err());
    }
}
