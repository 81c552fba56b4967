//! Lookup-table artifacts.
//!
//! A [`RadixLut`] holds one or more truth tables, a per-block table selector
//! and a per-block input index, together with the workspace its bootstraps
//! run in. Artifacts that never run concurrently can share one workspace: the
//! first one is allocated [`Owned`], the others [`Reused`] and are applied
//! with the owner's workspace.

mod artifact;
mod generator;
mod workspace;

pub use artifact::*;
pub use generator::*;
pub use workspace::*;
