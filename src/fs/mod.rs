//! Filesystem utilities for fct-provision.
//!
//! Atomic in-place rewriting of example files, and cross-mount relocation of
//! extracted files into the destination project tree.

pub mod atomic;
mod relocate;
mod rewrite;

pub use atomic::{AtomicFile, atomic_write};
pub use relocate::{relocate, relocate_to};
pub use rewrite::{ExciseOutcome, Substitution, excise_block, rewrite_references};
