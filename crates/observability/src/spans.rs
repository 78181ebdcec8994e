//! Span macros and span recording helpers

/// Create a span around one conversation-to-request conversion
///
/// # Example
///
/// ```rust
/// use parley_observability::conversion_span;
///
/// let span = conversion_span!(12usize);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! conversion_span {
    ($message_count:expr) => {
        tracing::info_span!(
            "aix.reduce",
            messages = $message_count,
            turns = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    };
}

/// Create a span for an asset store or resize operation
///
/// # Example
///
/// ```rust
/// use parley_observability::asset_span;
///
/// let span = asset_span!("asset-123", "materialize");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! asset_span {
    ($asset_id:expr, $operation:expr) => {
        tracing::debug_span!(
            "asset.operation",
            asset.id = $asset_id,
            asset.operation = $operation,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span and log it
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "operation failed");
}

/// Record a duration in milliseconds on the current span
pub fn record_duration(key: &str, duration: std::time::Duration) {
    tracing::Span::current().record(key, duration.as_millis() as u64);
}
