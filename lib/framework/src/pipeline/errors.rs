#[derive(Debug, thiserror::Error)]
#[error("Sender is closed.")]
pub struct ClosedError;
