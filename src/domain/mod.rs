//! Core domain types and logic.

pub mod bar;
pub mod calendar;
pub mod candidate;
pub mod error;
pub mod fundamentals;
pub mod indicator;
pub mod message;
pub mod price_series;
pub mod recommendation;
pub mod scan;
pub mod scan_config;
pub mod scoring;
pub mod trade;
pub mod universe;
