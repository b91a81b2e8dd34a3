mod errors;

use event::Metrics;
pub use errors::ClosedError;
use tokio::sync::mpsc;

/// The sending half between a source and whoever consumes its metrics.
/// Every `send` carries one batch, usually one collection cycle.
#[derive(Clone, Debug)]
pub struct Pipeline {
    inner: mpsc::Sender<Metrics>,
}

impl Pipeline {
    pub fn new_with_buffer(n: usize) -> (Self, mpsc::Receiver<Metrics>) {
        let (inner, rx) = mpsc::channel(n);

        (Self { inner }, rx)
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn new_test() -> (Self, mpsc::Receiver<Metrics>) {
        Self::new_with_buffer(128)
    }

    pub async fn send(&mut self, metrics: impl Into<Metrics>) -> Result<(), ClosedError> {
        let metrics = metrics.into();
        if metrics.is_empty() {
            return Ok(());
        }

        self.inner.send(metrics).await.map_err(|_| ClosedError)
    }
}

#[cfg(test)]
mod tests {
    use event::{Metric, tags};

    use super::*;

    #[tokio::test]
    async fn send_and_close() {
        let (mut pipeline, mut rx) = Pipeline::new_test();

        let metric = Metric::counter_with_tags("foo", "desc", 1, tags!());
        pipeline.send(vec![metric.clone()]).await.unwrap();
        assert_eq!(rx.recv().await, Some(vec![metric.clone()]));

        drop(rx);
        assert!(pipeline.send(vec![metric]).await.is_err());
    }

    #[tokio::test]
    async fn empty_batch_is_not_sent() {
        let (mut pipeline, mut rx) = Pipeline::new_test();

        pipeline.send(Vec::new()).await.unwrap();
        drop(pipeline);

        assert_eq!(rx.recv().await, None);
    }
}
