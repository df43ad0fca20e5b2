//! Report module - pipeline orchestration and presentation

pub mod analytics;
pub mod chart;
pub mod export;
pub mod render;
pub mod summary;

pub use analytics::*;
pub use chart::*;
pub use export::*;
pub use render::*;
pub use summary::*;
