use std::path::Path;

use serde::de;

/// The format used to represent the configuration data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum Format {
    JSON,
    #[default]
    YAML,
}

impl Format {
    pub fn from_path<T: AsRef<Path>>(path: T) -> Result<Self, T> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::YAML),
            Some("json") => Ok(Format::JSON),
            _ => Err(path),
        }
    }
}

pub type FormatHint = Option<Format>;

/// Parse the string represented in the specified format.
/// If the format is unknown - fallback to the default format and attempt
/// parsing using that.
pub fn deserialize<T>(content: &str, format: FormatHint) -> Result<T, Vec<String>>
where
    T: de::DeserializeOwned,
{
    match format.unwrap_or_default() {
        Format::YAML => serde_yaml::from_str(content).map_err(|e| vec![e.to_string()]),
        Format::JSON => serde_json::from_str(content).map_err(|e| vec![e.to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        root: String,
    }

    #[test]
    fn format_from_path() {
        assert_eq!(Format::from_path("a/config.yaml"), Ok(Format::YAML));
        assert_eq!(Format::from_path("config.yml"), Ok(Format::YAML));
        assert_eq!(Format::from_path("config.json"), Ok(Format::JSON));
        assert_eq!(Format::from_path("config.toml"), Err("config.toml"));
        assert_eq!(Format::from_path("config"), Err("config"));
    }

    #[test]
    fn deserialize_by_hint() {
        let expected = Sample {
            root: "/sys".to_string(),
        };

        let got: Sample = deserialize("root: /sys", Some(Format::YAML)).unwrap();
        assert_eq!(got, expected);

        let got: Sample = deserialize(r#"{"root": "/sys"}"#, Some(Format::JSON)).unwrap();
        assert_eq!(got, expected);

        // unknown format falls back to yaml
        let got: Sample = deserialize("root: /sys", None).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn deserialize_error() {
        let errs = deserialize::<Sample>("foo: bar", Some(Format::YAML)).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("missing field `root`"), "{}", errs[0]);
    }
}
