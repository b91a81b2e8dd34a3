use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::de::DeserializeOwned;

use super::{Format, FormatHint, format};

static ENVIRONMENT_VARIABLE_INTERPOLATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$|
        \$([[:word:].]+)|
        \$\{([[:word:].]+)(?::-([^}]*))?\}",
    )
    .expect("interpolation regex is valid")
});

/// Read the file at `path`, interpolate environment variables and
/// deserialize it. The format is picked from the file extension, YAML
/// is used when the extension is unknown.
pub fn load_from_path<T>(path: &Path) -> Result<T, Vec<String>>
where
    T: DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .map_err(|err| vec![format!("Could not read config file {:?}, {}", path, err)])?;

    load_from_str(&content, Format::from_path(path).ok())
}

pub fn load_from_str<T>(content: &str, format: FormatHint) -> Result<T, Vec<String>>
where
    T: DeserializeOwned,
{
    let vars = std::env::vars_os()
        .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            _ => None,
        })
        .collect::<HashMap<_, _>>();

    let with_vars = interpolate(content, &vars)?;

    format::deserialize(&with_vars, format)
}

/// Expand `$NAME`, `${NAME}` and `${NAME:-default}` with `vars`, `$$` is
/// an escaped `$`. A variable which is unset and has no default is an error.
pub fn interpolate<'a>(
    input: &'a str,
    vars: &HashMap<String, String>,
) -> Result<Cow<'a, str>, Vec<String>> {
    let mut errs = Vec::new();

    let interpolated =
        ENVIRONMENT_VARIABLE_INTERPOLATION_REGEX.replace_all(input, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
                // `$$`
                return "$".to_string();
            };

            match (vars.get(name), caps.get(3)) {
                (Some(value), Some(default)) if value.is_empty() => default.as_str().to_string(),
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => {
                    errs.push(format!(
                        "Missing environment variable in config. name = {name:?}"
                    ));
                    String::new()
                }
            }
        });

    if errs.is_empty() {
        Ok(interpolated)
    } else {
        Err(errs)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    fn vars() -> HashMap<String, String> {
        [
            ("FOO", "dogs"),
            ("FOOBAR", "cats"),
            ("FOO.BAR", "turtles"),
            ("EMPTY", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn interpolation() {
        let vars = vars();

        assert_eq!("dogs", interpolate("$FOO", &vars).unwrap());
        assert_eq!("dogs", interpolate("${FOO}", &vars).unwrap());
        assert_eq!("cats", interpolate("${FOOBAR}", &vars).unwrap());
        assert_eq!("turtles", interpolate("$FOO.BAR", &vars).unwrap());
        assert_eq!("xdogsx", interpolate("x${FOO}x", &vars).unwrap());
        assert_eq!("x${FOO}x", interpolate("x$${FOO}x", &vars).unwrap());
        assert_eq!("$FOO", interpolate("$$FOO", &vars).unwrap());
        assert_eq!("/sys", interpolate("${MISSING:-/sys}", &vars).unwrap());
        assert_eq!("fallback", interpolate("${EMPTY:-fallback}", &vars).unwrap());
        assert_eq!("", interpolate("${EMPTY}", &vars).unwrap());
    }

    #[test]
    fn missing_variable() {
        let errs = interpolate("path: ${NOT_SET_ANYWHERE}", &vars()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("NOT_SET_ANYWHERE"));
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        root: String,
    }

    #[test]
    fn load_with_default() {
        let sample: Sample =
            load_from_str("root: ${POWERCAP_TEST_UNSET_ROOT:-/sys}", Some(Format::YAML)).unwrap();
        assert_eq!(sample.root, "/sys");
    }
}
