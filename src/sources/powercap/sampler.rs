use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use event::{Metric, Tags, tags};

use super::discovery::{Device, ENERGY_FILE};

pub const MEASUREMENT: &str = "powercap";

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("read energy counter failed, {0}")]
    Read(#[from] std::io::Error),
    #[error("parse energy counter failed, {0}")]
    Parse(#[from] ParseIntError),
}

/// A device that produced no observation in this cycle.
#[derive(Debug)]
pub struct SampleFailure {
    /// The counter file that failed
    pub path: PathBuf,
    pub error: SampleError,
}

/// One counter reading of one device.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Cumulative energy in microjoules, exactly as the kernel reports it
    pub energy_uj: u64,
    /// `device`, `driver` and `name` of the source device
    pub tags: Tags,
}

impl Observation {
    /// Measurement and field are joined to form the metric name.
    pub fn into_metric(self) -> Metric {
        Metric::counter_with_tags(
            format!("{MEASUREMENT}_{ENERGY_FILE}"),
            "Cumulative energy counter of the powercap zone in microjoules",
            self.energy_uj,
            self.tags,
        )
    }
}

#[derive(Debug, Default)]
pub struct Sample {
    pub observations: Vec<Observation>,
    pub failures: Vec<SampleFailure>,
}

/// Read the energy counter of every device once. A device that can't be
/// read or parsed is reported in `failures` and skipped, the rest of the
/// cycle goes on.
pub fn sample(devices: &[Device]) -> Sample {
    let mut sample = Sample::default();

    for device in devices {
        let path = device.energy_path();

        match read_energy(&path) {
            Ok(energy_uj) => sample.observations.push(Observation {
                energy_uj,
                tags: tags!(
                    "device" => device.device.as_str(),
                    "driver" => device.driver.as_str(),
                    "name" => device.name.as_str(),
                ),
            }),
            Err(error) => sample.failures.push(SampleFailure { path, error }),
        }
    }

    sample
}

fn read_energy(path: &Path) -> Result<u64, SampleError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.trim().parse::<u64>()?)
}
