//! Collect energy counters from the Linux powercap framework.
//!
//! Zones are discovered once when the source is built, then every zone's
//! `energy_uj` is read on each tick and emitted as `powercap_energy_uj`.
//! The counters are reported as read, no rate is derived and wraparound
//! is not handled.

pub mod discovery;
pub mod sampler;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use framework::config::{SourceConfig, SourceContext};
use framework::{Pipeline, ShutdownSignal, Source};
use serde::{Deserialize, Serialize};

pub use discovery::{Device, Discovery, DiscoveryWarning, discover};
pub use sampler::{Observation, Sample, SampleError, SampleFailure, sample};

pub const DEFAULT_SYSFS_PATH: &str = "/sys/devices/virtual/powercap";

/// Example configuration, printed by `powercap sample-config`.
pub const SAMPLE_CONFIG: &str = r#"# Root of the powercap sysfs tree
sysfs_path: /sys/devices/virtual/powercap

# The interval between two collections
interval: 15s
"#;

const fn default_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_sysfs_path() -> PathBuf {
    DEFAULT_SYSFS_PATH.into()
}

/// Collect power usage statistics from the Linux powercap driver.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PowercapConfig {
    /// Root of the powercap sysfs tree, every directory right below it is
    /// a driver.
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: PathBuf,

    /// The interval between two collections
    #[serde(default = "default_interval", with = "humanize::duration::serde")]
    pub interval: Duration,
}

impl Default for PowercapConfig {
    fn default() -> Self {
        Self {
            sysfs_path: default_sysfs_path(),
            interval: default_interval(),
        }
    }
}

#[async_trait::async_trait]
impl SourceConfig for PowercapConfig {
    async fn build(&self, cx: SourceContext) -> crate::Result<Source> {
        if self.interval.is_zero() {
            return Err("interval must be greater than zero".into());
        }

        let Discovery { devices, warnings } = discover(&self.sysfs_path)?;

        for warning in &warnings {
            warn!(
                message = "powercap discovery skipped a branch",
                path = ?warning.path(),
                %warning,
            );
        }

        if devices.is_empty() {
            warn!(message = "no powercap zone found", root = ?self.sysfs_path);
        } else {
            info!(
                message = "powercap zones discovered",
                root = ?self.sysfs_path,
                devices = devices.len(),
            );
        }

        Ok(Box::pin(run(
            self.interval,
            devices.into(),
            cx.output,
            cx.shutdown,
        )))
    }
}

async fn run(
    interval: Duration,
    devices: Arc<[Device]>,
    mut output: Pipeline,
    mut shutdown: ShutdownSignal,
) -> Result<(), ()> {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break,
            // The first tick completes immediately
            _ = ticker.tick() => {}
        }

        let metrics = collect(&devices);

        if let Err(err) = output.send(metrics).await {
            warn!(message = "failed to send metrics", %err);
            break;
        }
    }

    Ok(())
}

/// Run one sampling cycle, log its failures and stamp the results.
fn collect(devices: &[Device]) -> Vec<event::Metric> {
    let Sample {
        observations,
        failures,
    } = sample(devices);

    for failure in failures {
        error!(
            message = "read energy counter failed, skipping",
            path = ?failure.path,
            err = %failure.error,
        );
    }

    let now = Some(Utc::now());
    observations
        .into_iter()
        .map(|observation| observation.into_metric().with_timestamp(now))
        .collect()
}
