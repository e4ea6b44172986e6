//! Distributed representations of positions and items.
//!
//! - **Positions**: binary block codes with temporal persistence
//! - **Items**: continuous feature vectors with unspecified dimensions
//! - **Patterns**: random, similar and overlapping pattern generators
//! - **Store**: LTM and WM vectors of every item slot

pub mod embeddings;
pub mod item;
pub mod pattern;
pub mod position;
pub mod store;
