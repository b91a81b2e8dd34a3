use tokio::sync::mpsc;

use event::Metrics;

use crate::{Pipeline, ShutdownSignal};

pub struct SourceContext {
    pub output: Pipeline,
    pub shutdown: ShutdownSignal,
}

impl SourceContext {
    #[cfg(any(test, feature = "test-util"))]
    pub fn new_test() -> (Self, mpsc::Receiver<Metrics>) {
        let (output, rx) = Pipeline::new_test();

        (
            Self {
                output,
                shutdown: ShutdownSignal::noop(),
            },
            rx,
        )
    }

    /// Build a context whose shutdown is controlled by the returned trigger.
    pub fn new_with_shutdown(buf_size: usize) -> (Self, crate::Trigger, mpsc::Receiver<Metrics>) {
        let (output, rx) = Pipeline::new_with_buffer(buf_size);
        let (trigger, shutdown) = ShutdownSignal::new();

        (Self { output, shutdown }, trigger, rx)
    }
}

/// Generalized trait for describing and building source components.
#[async_trait::async_trait]
pub trait SourceConfig: Send + Sync {
    /// Builds the source with the given context.
    async fn build(&self, cx: SourceContext) -> crate::Result<crate::Source>;
}
