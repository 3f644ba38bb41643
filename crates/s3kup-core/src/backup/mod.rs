//! Pushing new versions and pruning old ones.

pub mod pruner;
pub mod writer;

pub use pruner::{surplus, Pruner};
pub use writer::{BackupWriter, PushReport};
