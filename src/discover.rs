use std::io::Write;
use std::path::PathBuf;

use argh::FromArgs;
use exitcode::ExitCode;
use powercap::sources::powercap::{Device, Discovery, discover};

use crate::launch::handle_config_errors;

#[derive(Debug, FromArgs, PartialEq)]
#[argh(
    subcommand,
    name = "discover",
    description = "Discover powercap zones once, print them, then exit",
    help_triggers("-h", "--help")
)]
pub struct Discover {
    #[argh(
        option,
        short = 'c',
        long = "config",
        description = "read configuration from file, YAML or JSON"
    )]
    config: Option<PathBuf>,

    #[argh(option, description = "root of the powercap tree, overrides the configuration")]
    sysfs_path: Option<PathBuf>,
}

impl Discover {
    pub fn run(&self) -> Result<(), ExitCode> {
        let mut config =
            powercap::config::load(self.config.as_deref()).map_err(handle_config_errors)?;
        if let Some(path) = &self.sysfs_path {
            config.sysfs_path = path.clone();
        }

        let Discovery {
            mut devices,
            warnings,
        } = discover(&config.sysfs_path).map_err(|err| {
            eprintln!("{err}");
            exitcode::NOINPUT
        })?;

        for warning in warnings {
            eprintln!("warning: {warning}");
        }

        devices.sort_by(|a, b| a.path.cmp(&b.path));

        let mut stdout = std::io::stdout().lock();
        write_devices(&mut stdout, &devices).map_err(|_| exitcode::IOERR)
    }
}

fn write_devices(w: &mut impl Write, devices: &[Device]) -> std::io::Result<()> {
    for device in devices {
        writeln!(
            w,
            "driver={} device={} name={:?} path={}",
            device.driver,
            device.device,
            device.name,
            device.path.display()
        )?;
    }

    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_device() {
        let devices = vec![Device {
            driver: "intel-rapl".to_string(),
            name: "package-0".to_string(),
            path: PathBuf::from("/sys/devices/virtual/powercap/intel-rapl/intel-rapl:0"),
            device: "intel-rapl:0".to_string(),
        }];

        let mut buf = Vec::new();
        write_devices(&mut buf, &devices).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "driver=intel-rapl device=intel-rapl:0 name=\"package-0\" path=/sys/devices/virtual/powercap/intel-rapl/intel-rapl:0\n"
        );
    }
}
