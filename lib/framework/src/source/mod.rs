use futures::future::BoxFuture;

/// A running source. It resolves once the source has stopped, either
/// because shutdown was signalled or because its output closed.
pub type Source = BoxFuture<'static, Result<(), ()>>;
