use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::pin::pin;
use std::str::FromStr;
use std::time::Duration;

use argh::FromArgs;
use event::{Metric, Metrics};
use exitcode::ExitCode;
use framework::config::{SourceConfig, SourceContext};
use framework::{SignalTo, signal};
use futures::{Stream, StreamExt};
use powercap::sources::powercap::SAMPLE_CONFIG;
use tokio::sync::mpsc::Receiver;
use tracing::{error, info};

use crate::discover::Discover;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(FromArgs)]
#[argh(
    description = "Collect energy counters from the Linux powercap framework",
    help_triggers("-h", "--help")
)]
pub struct RootCommand {
    #[argh(switch, short = 'v', description = "show version")]
    version: bool,

    #[argh(
        option,
        short = 'l',
        default = "\"info\".to_string()",
        description = "log level"
    )]
    log_level: String,

    #[argh(
        option,
        default = "LogFormat::Text",
        description = "log format, text or json"
    )]
    log_format: LogFormat,

    #[argh(
        option,
        short = 'c',
        long = "config",
        description = "read configuration from file, YAML or JSON, defaults are used if not set"
    )]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    sub_commands: Option<SubCommands>,
}

impl RootCommand {
    #![allow(clippy::print_stdout)]
    fn show_version(&self) {
        println!("powercap {}", PKG_VERSION);
    }

    pub fn run(&self) -> Result<(), ExitCode> {
        if self.version {
            self.show_version();
            return Ok(());
        }

        if let Some(sub_command) = &self.sub_commands {
            return sub_command.run();
        }

        // Collection is plain sequential file reads, one thread is enough.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(|err| {
                eprintln!("build tokio runtime failed, {err}");
                exitcode::OSERR
            })?;

        let levels = log_levels(&self.log_level);
        let color = std::io::stderr().is_terminal();
        framework::trace::init(color, self.log_format == LogFormat::Json, &levels);

        runtime.block_on(async move {
            info!(
                message = "Start powercap",
                version = PKG_VERSION,
                config = ?self.config,
            );

            let config =
                powercap::config::load(self.config.as_deref()).map_err(handle_config_errors)?;

            let (cx, trigger, mut output) = SourceContext::new_with_shutdown(16);
            let source = config.build(cx).await.map_err(|err| {
                error!(message = "build powercap source failed", %err);
                exitcode::NOINPUT
            })?;
            let source = tokio::spawn(source);

            let mut signals = pin!(signal::os_signals());
            let mut stdout = std::io::stdout().lock();

            match serve(&mut output, &mut signals, &mut stdout).await {
                Stopped::Source => {
                    info!(message = "Source stopped");
                    let _ = source.await;
                }

                Stopped::Write(err) => {
                    error!(message = "write metrics to stdout failed", %err);
                    trigger.cancel();
                    // a source blocked on a full output must see it closed
                    drop(output);
                    let _ = source.await;
                }

                Stopped::Signal(SignalTo::Shutdown) => {
                    info!(message = "Shutdown signal received");
                    trigger.cancel();

                    let drain = async {
                        while let Some(metrics) = output.recv().await {
                            if emit(&mut stdout, &metrics).is_err() {
                                break;
                            }
                        }

                        let _ = source.await;
                    };

                    tokio::select! {
                        _ = drain => (),
                        // a second signal stops waiting
                        _ = signals.next() => (),
                        _ = tokio::time::sleep(Duration::from_secs(5)) => {
                            error!(message = "source failed to shutdown before deadline");
                        }
                    }
                }

                Stopped::Signal(SignalTo::Quit) => {
                    info!(message = "Quit signal received");
                    source.abort();
                }
            }

            Ok::<(), ExitCode>(())
        })?;

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format {s:?}, expect text or json")),
        }
    }
}

fn log_levels(level: &str) -> String {
    std::env::var("POWERCAP_LOG").unwrap_or_else(|_| match level {
        "off" => "off".to_string(),
        level => format!("powercap={level},framework={level}"),
    })
}

/// Why [`serve`] returned.
#[derive(Debug)]
enum Stopped {
    /// The source ended and closed its output
    Source,
    Signal(SignalTo),
    Write(std::io::Error),
}

/// Write every received batch to `w` until the source stops, a signal
/// arrives or writing fails.
async fn serve<S>(output: &mut Receiver<Metrics>, signals: &mut S, w: &mut impl Write) -> Stopped
where
    S: Stream<Item = SignalTo> + Unpin,
{
    loop {
        tokio::select! {
            metrics = output.recv() => match metrics {
                Some(metrics) => {
                    if let Err(err) = emit(w, &metrics) {
                        return Stopped::Write(err);
                    }
                }
                None => return Stopped::Source,
            },

            Some(signal) = signals.next() => return Stopped::Signal(signal),
        }
    }
}

fn emit(w: &mut impl Write, metrics: &[Metric]) -> std::io::Result<()> {
    for metric in metrics {
        writeln!(w, "{}", metric)?;
    }

    w.flush()
}

pub fn handle_config_errors(errors: Vec<String>) -> ExitCode {
    for err in errors {
        error!(message = "configuration error", %err);
    }

    exitcode::CONFIG
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommands {
    SampleConfig(SampleConfig),
    Discover(Discover),
}

impl SubCommands {
    fn run(&self) -> Result<(), ExitCode> {
        match self {
            SubCommands::SampleConfig(cmd) => {
                cmd.run();
                Ok(())
            }
            SubCommands::Discover(cmd) => cmd.run(),
        }
    }
}

#[derive(Debug, FromArgs)]
#[argh(
    subcommand,
    name = "sample-config",
    description = "Print an example configuration",
    help_triggers("-h", "--help")
)]
struct SampleConfig {}

impl SampleConfig {
    #![allow(clippy::print_stdout)]
    fn run(&self) {
        print!("{SAMPLE_CONFIG}");
    }
}
