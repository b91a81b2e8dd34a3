use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs are written to stderr so
/// stdout stays free for emitted metrics.
///
/// `levels` is an `EnvFilter` directive, e.g. `powercap=info,framework=info`.
/// An invalid directive falls back to `info`.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|err| {
        eprintln!("invalid log level directive {levels:?}, {err}");
        EnvFilter::new("info")
    });

    let builder = tracing_subscriber::fmt()
        .with_ansi(color)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A subscriber installed earlier, by tests for example, wins.
    if let Err(err) = result {
        eprintln!("tracing subscriber already installed, {err}");
    }
}
