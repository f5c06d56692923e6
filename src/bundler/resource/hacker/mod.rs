//! Resource Hacker adapter.
//!
//! - `toolset` - locate or download the editor
//! - `command` - typed command line and execution

mod command;
mod toolset;

pub use command::{RhAction, RhCommand};
pub use toolset::{RESOURCE_HACKER_URL, ResourceHacker, cached_exe_path, get_resource_hacker};
