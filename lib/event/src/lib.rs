mod macros;
mod metric;
pub mod tags;

pub use metric::{Metric, MetricSeries, MetricValue, Metrics};
pub use tags::Tags;
