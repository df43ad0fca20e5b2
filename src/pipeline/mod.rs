//! Pipeline module - the analytics core and its data loader

pub mod aggregate;
pub mod correlation;
pub mod dataset;
pub mod describe;
pub mod error;
pub mod histogram;
pub mod join;
pub mod loader;

pub use aggregate::*;
pub use correlation::*;
pub use dataset::{Column, ColumnType, Dataset, Field, RowView, Rows, Schema, Value};
pub use describe::*;
pub use error::{AnalyticsError, JoinSide, Operation};
pub use histogram::*;
pub use join::*;
pub use loader::*;
