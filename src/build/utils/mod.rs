//! Filesystem and archive helpers shared by the operations.

pub mod fs;
pub mod tarball;
