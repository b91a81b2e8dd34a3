use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Write};

/// Ordered key/value labels attached to a metric series.
#[derive(Clone, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tags = Tags::default();
        iter.into_iter().for_each(|(k, v)| {
            tags.insert(k, v);
        });

        tags
    }
}

/// Renders tags as `{k1="v1",k2="v2"}`, nothing when empty. Values are
/// escaped like Prometheus label values, only `\`, `"` and line feeds.
impl Display for Tags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }

        f.write_char('{')?;
        for (n, (k, v)) in self.0.iter().enumerate() {
            if n != 0 {
                f.write_char(',')?;
            }
            write!(f, "{k}=\"")?;
            write_escaped(f, v)?;
            f.write_char('"')?;
        }
        f.write_char('}')
    }
}

fn write_escaped(f: &mut Formatter<'_>, value: &str) -> std::fmt::Result {
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Tags::new().to_string(), "");

        let tags = Tags::from_iter([("b", "2"), ("a", "1")]);
        assert_eq!(tags.to_string(), r#"{a="1",b="2"}"#);

        let tags = Tags::from_iter([("name", "say \"hi\"")]);
        assert_eq!(tags.to_string(), r#"{name="say \"hi\""}"#);
    }

    #[test]
    fn display_escape() {
        let tags = Tags::from_iter([("name", "café ünïcode")]);
        assert_eq!(tags.to_string(), r#"{name="café ünïcode"}"#);

        let tags = Tags::from_iter([("name", "a\\b\nc")]);
        assert_eq!(tags.to_string(), r#"{name="a\\b\nc"}"#);
    }
}
