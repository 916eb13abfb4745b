//! PoseFix Label Editor
//!
//! Corrects tracked labels in a coordinate store:
//!
//! ```text
//! store ──load──► working copy ──edit──► full rewrite ──► store
//!                      │
//!                      ├── swap one frame between two individuals
//!                      ├── swap a frame range between two individuals
//!                      ├── propagate one frame forward/backward
//!                      └── overwrite one frame with edited points
//! ```
//!
//! Every edit validates before it writes and rewrites the whole store under
//! its original key. A failed edit leaves the store untouched. Access to one
//! store must be serialized by the caller.

pub mod edit;
pub mod editor;

pub use edit::*;
pub use editor::LabelEditor;
