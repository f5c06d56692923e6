//! Shared helpers: filesystem, HTTP downloads, archives, checksums.

pub mod archive;
pub mod checksum;
pub mod fs;
pub mod http;
