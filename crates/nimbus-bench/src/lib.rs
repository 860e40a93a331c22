//! Native GPU benchmark for the cloud renderer: renders fixed scenes offscreen,
//! reports frame-time statistics and compares them against a JSON baseline.

pub mod report;
pub mod runner;
pub mod scenes;
