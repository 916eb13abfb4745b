//! PoseFix Pose Model
//!
//! Defines the core data contracts for pose-tracking correction:
//! - **Table:** Per-frame, per-individual, per-bodypart `(x, y)` coordinates
//! - **Store:** Wholesale load/save of a table as JSON or multi-header CSV
//! - **Index list:** Persisted frame indices flagged as suspect
//! - **Session:** Last reviewed frame per video
//!
//! All coordinates are pixels of the original, unscaled video frame.
//! Display-space values are converted at the edges with a scale factor.

pub mod index_list;
pub mod point;
pub mod session;
pub mod store;
pub mod table;

pub use index_list::*;
pub use point::*;
pub use session::*;
pub use store::*;
pub use table::*;
