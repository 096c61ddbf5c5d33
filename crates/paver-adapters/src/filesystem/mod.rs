//! Filesystem adapters.

mod local;
mod memory;

pub use local::{DEFAULT_MODE, EXECUTABLE_MODE, LocalFilesystem};
pub use memory::MemoryFilesystem;

pub(crate) use local::map_io_error;
