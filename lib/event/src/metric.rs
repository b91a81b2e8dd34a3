use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::Tags;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricValue {
    /// Monotonic counter kept as the exact integer read, e.g. an energy
    /// counter in microjoules.
    Counter(u64),
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Counter(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    pub tags: Tags,
}

/// The type alias for an array of `Metric` elements
pub type Metrics = Vec<Metric>;

#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub series: MetricSeries,

    pub description: Option<String>,

    pub timestamp: Option<DateTime<Utc>>,

    pub value: MetricValue,
}

impl Display for Metric {
    /// Display a metric using something like Prometheus's text format
    ///
    /// ```text
    /// TIMESTAMP NAME{TAGS} VALUE
    /// ```
    ///
    /// TIMESTAMP is in ISO 8601 format with UTC time zone, and omitted
    /// if the metric is not stamped yet.
    ///
    /// example:
    /// ```text
    /// 2024-08-12T20:23:37.248661343Z powercap_energy_uj{device="intel-rapl:0",driver="intel-rapl",name="package-0"} 240422366267
    /// ```
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(timestamp) = &self.timestamp {
            write!(fmt, "{:?} ", timestamp)?;
        }

        write!(fmt, "{}{} {}", self.name(), self.series.tags, self.value)
    }
}

impl Metric {
    #[inline]
    pub fn counter_with_tags<N, D>(name: N, desc: D, value: u64, tags: Tags) -> Metric
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            series: MetricSeries {
                name: name.into(),
                tags,
            },
            description: Some(desc.into()),
            timestamp: None,
            value: MetricValue::Counter(value),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.series.name
    }

    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    #[inline]
    pub fn with_timestamp(mut self, ts: Option<DateTime<Utc>>) -> Self {
        self.timestamp = ts;
        self
    }

    #[inline]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.series.tags.get(name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::tags;

    #[test]
    fn counter() {
        let m = Metric::counter_with_tags("name", "desc", 2, tags!("foo" => "bar"));
        assert_eq!(m.name(), "name");
        assert_eq!(m.description, Some("desc".to_string()));
        assert_eq!(m.tag_value("foo"), Some("bar"));
        assert_eq!(m.value, MetricValue::Counter(2));
    }

    #[test]
    fn display() {
        let m = Metric::counter_with_tags(
            "powercap_energy_uj",
            "desc",
            1000,
            tags!("driver" => "pkg", "name" => "Package"),
        );
        assert_eq!(
            m.to_string(),
            r#"powercap_energy_uj{driver="pkg",name="Package"} 1000"#
        );

        let ts = Utc.with_ymd_and_hms(2024, 8, 12, 20, 23, 37).unwrap();
        let m = m.with_timestamp(Some(ts));
        assert_eq!(
            m.to_string(),
            r#"2024-08-12T20:23:37Z powercap_energy_uj{driver="pkg",name="Package"} 1000"#
        );
    }

    #[test]
    fn display_keeps_every_digit() {
        // 2^53 + 1 can not be represented by an f64
        for value in [9_007_199_254_740_993, u64::MAX] {
            let m = Metric::counter_with_tags("powercap_energy_uj", "", value, tags!());
            assert_eq!(m.to_string(), format!("powercap_energy_uj {value}"));
        }
    }
}
