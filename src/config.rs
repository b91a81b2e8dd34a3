use std::path::Path;

use crate::sources::powercap::PowercapConfig;

/// Load the configuration from `path`, or the defaults if no path given.
pub fn load(path: Option<&Path>) -> Result<PowercapConfig, Vec<String>> {
    match path {
        Some(path) => framework::config::load_from_path(path),
        None => Ok(PowercapConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use testify::temp_dir;

    use super::*;

    #[test]
    fn defaults_without_path() {
        assert_eq!(load(None).unwrap(), PowercapConfig::default());
    }

    #[test]
    fn yaml_and_json() {
        let dir = temp_dir();

        let yaml = dir.path().join("powercap.yaml");
        std::fs::write(&yaml, "sysfs_path: /a\ninterval: 5s\n").unwrap();
        let config = load(Some(yaml.as_path())).unwrap();
        assert_eq!(config.sysfs_path, PathBuf::from("/a"));
        assert_eq!(config.interval, Duration::from_secs(5));

        let json = dir.path().join("powercap.json");
        std::fs::write(&json, r#"{"sysfs_path": "/b"}"#).unwrap();
        let config = load(Some(json.as_path())).unwrap();
        assert_eq!(config.sysfs_path, PathBuf::from("/b"));
        assert_eq!(config.interval, Duration::from_secs(15));
    }

    #[test]
    fn missing_file() {
        let dir = temp_dir();
        let errs = load(Some(dir.path().join("missing.yaml").as_path())).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("Could not read config file"));
    }
}
