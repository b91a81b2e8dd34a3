use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;
use tokio::signal::unix::Signal;

/// Control messages used to drive the shutdown of the process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignalTo {
    /// Signal to shutdown process, letting running sources finish
    Shutdown,
    /// Shutdown process immediately
    Quit,
}

pin_project! {
    pub struct Signals {
        #[pin]
        sigint: Signal,
        #[pin]
        sigterm: Signal,
        #[pin]
        sigquit: Signal,
    }
}

impl Stream for Signals {
    type Item = SignalTo;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if this.sigint.poll_recv(cx).is_ready() {
            info!(message = "Signal received", signal = "SIGINT");
            return Poll::Ready(Some(SignalTo::Shutdown));
        }

        if this.sigterm.poll_recv(cx).is_ready() {
            info!(message = "Signal received", signal = "SIGTERM");
            return Poll::Ready(Some(SignalTo::Shutdown));
        }

        if this.sigquit.poll_recv(cx).is_ready() {
            info!(message = "Signal received", signal = "SIGQUIT");
            return Poll::Ready(Some(SignalTo::Quit));
        }

        Poll::Pending
    }
}

/// Signals from OS/user
pub fn os_signals() -> Signals {
    use tokio::signal::unix::{SignalKind, signal};

    let sigint = signal(SignalKind::interrupt()).expect("Failed to set up SIGINT handle");
    let sigterm = signal(SignalKind::terminate()).expect("Failed to set up SIGTERM handle");
    let sigquit = signal(SignalKind::quit()).expect("Failed to set up SIGQUIT handle");

    Signals {
        sigint,
        sigterm,
        sigquit,
    }
}
