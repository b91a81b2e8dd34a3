mod format;
mod loading;
mod source;

pub use format::{Format, FormatHint, deserialize};
pub use loading::{interpolate, load_from_path, load_from_str};
pub use source::{SourceConfig, SourceContext};
