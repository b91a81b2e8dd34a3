//! Find powercap zones under a sysfs root.
//!
//! https://www.kernel.org/doc/Documentation/power/powercap/powercap.txt
//!
//! ```text
//! /sys/devices/virtual/powercap
//! └── intel-rapl                      <- driver
//!     ├── power                       <- never a zone
//!     ├── intel-rapl:0                <- zone
//!     │   ├── name
//!     │   ├── energy_uj
//!     │   └── intel-rapl:0:0          <- nested zone
//!     │       ├── name
//!     │       └── energy_uj
//!     └── intel-rapl:1
//! ```

use std::path::{Path, PathBuf};

/// Directories with this name hold runtime power-management attributes
/// and are never a driver, a zone, or something to descend into.
const SENTINEL: &str = "power";
const NAME_FILE: &str = "name";
pub const ENERGY_FILE: &str = "energy_uj";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read powercap root {path:?} failed, {source}")]
    ReadRoot {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Non-fatal problems met while walking the tree. The branch they
/// belong to contributes no device, everything else is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryWarning {
    #[error("read powercap directory {path:?} failed, {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read zone name {path:?} failed, {source}")]
    ReadName {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DiscoveryWarning {
    pub fn path(&self) -> &Path {
        match self {
            DiscoveryWarning::ReadDir { path, .. } | DiscoveryWarning::ReadName { path, .. } => {
                path
            }
        }
    }
}

/// One powercap zone that exposes an energy counter.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Device {
    /// Name of the top level directory this zone was found under
    pub driver: String,
    /// Trimmed content of the zone's `name` file
    pub name: String,
    /// Directory of the zone
    pub path: PathBuf,
    /// Base name of `path`, tells sibling zones with the same name apart
    pub device: String,
}

impl Device {
    pub fn energy_path(&self) -> PathBuf {
        self.path.join(ENERGY_FILE)
    }
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub devices: Vec<Device>,
    pub warnings: Vec<DiscoveryWarning>,
}

/// Walk `root` and return every zone found beneath it.
///
/// Only failing to list `root` itself is an error. The order of devices
/// follows the directory listing and must not be relied on.
pub fn discover(root: &Path) -> Result<Discovery, Error> {
    let entries = std::fs::read_dir(root).map_err(|source| Error::ReadRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let mut discovery = Discovery::default();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                discovery.warnings.push(DiscoveryWarning::ReadDir {
                    path: root.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        if !entry.file_type().is_ok_and(|typ| typ.is_dir()) {
            continue;
        }

        let Ok(driver) = entry.file_name().into_string() else {
            debug!(message = "skip driver with non utf8 name", path = ?entry.path());
            continue;
        };
        if driver == SENTINEL {
            continue;
        }

        scan_driver(&driver, entry.path(), &mut discovery);
    }

    Ok(discovery)
}

/// Depth first, pre-order walk of one driver subtree. A zone is evaluated
/// before its children, children are visited in listing order.
fn scan_driver(driver: &str, path: PathBuf, discovery: &mut Discovery) {
    let mut pending = vec![path];

    while let Some(path) = pending.pop() {
        let children = scan_zone(driver, path, discovery);

        // reversed so the first listed child is popped first
        pending.extend(children.into_iter().rev());
    }
}

/// Evaluate one directory as a zone and return its child directories.
fn scan_zone(driver: &str, path: PathBuf, discovery: &mut Discovery) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(&path) {
        Ok(entries) => entries,
        Err(source) => {
            discovery
                .warnings
                .push(DiscoveryWarning::ReadDir { path, source });
            return vec![];
        }
    };

    let mut children = vec![];
    let mut name = None;
    let mut has_energy = false;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                discovery.warnings.push(DiscoveryWarning::ReadDir {
                    path: path.clone(),
                    source,
                });
                continue;
            }
        };

        let filename = entry.file_name();
        // symlinks are not followed, sysfs links back to parents and classes
        if entry.file_type().is_ok_and(|typ| typ.is_dir()) && filename != SENTINEL {
            children.push(entry.path());
        }

        if filename == NAME_FILE {
            let name_path = entry.path();
            match std::fs::read_to_string(&name_path) {
                Ok(content) => {
                    debug!(message = "found powercap zone name", name = content.trim(), path = ?name_path);
                    name = Some(content.trim().to_string());
                }
                Err(source) => discovery.warnings.push(DiscoveryWarning::ReadName {
                    path: name_path,
                    source,
                }),
            }
        } else if filename == ENERGY_FILE {
            has_energy = true;
        }
    }

    let Some(name) = name.filter(|name| !name.is_empty()) else {
        debug!(message = "no zone name found", ?path);
        return children;
    };

    if !has_energy {
        debug!(message = "no energy counter found", ?path);
        return children;
    }

    let device = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    discovery.devices.push(Device {
        driver: driver.to_string(),
        name,
        path,
        device,
    });

    children
}
