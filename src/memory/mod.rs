//! Working-memory associations and cued retrieval.
//!
//! - **Association**: item × position-unit link strengths with decay
//! - **Retrieval**: noisy position-cued selection followed by LTM matching

pub mod association;
pub mod retrieval;
