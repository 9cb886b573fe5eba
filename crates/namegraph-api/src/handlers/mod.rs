//! API handlers

pub mod dashboard;
pub mod graphs;
pub mod health;
pub mod hover;

pub use health::health_check;
