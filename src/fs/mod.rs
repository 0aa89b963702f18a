//! File-system seam
//!
//! Resolvers only touch the disk through [`FileSystem`], so every rule can be
//! exercised against [`MockFileSystem`] without a temp dir.

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{Entry, EntryKind, FileSystem};
pub use real::RealFileSystem;
