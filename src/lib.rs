// Palisade: message-safety risk scoring and forecasting
//
// This is the library root. Each module corresponds to a major subsystem
// of the scoring pipeline.

pub mod classify;
pub mod config;
pub mod context;
pub mod db;
pub mod forecast;
pub mod labels;
pub mod output;
pub mod privacy;
pub mod scoring;
pub mod stats;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
