pub mod random;
pub mod sysfs;
pub mod temp;

pub use sysfs::SysfsTree;
pub use temp::{TempDir, temp_dir};
