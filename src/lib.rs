//! PayStat: Compensation Analytics Library
//!
//! Joins an employee table to a salary table, computes per-department
//! means, descriptive statistics of salary and the salary/bonus correlation,
//! and describes the charts a renderer should draw for each result.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
