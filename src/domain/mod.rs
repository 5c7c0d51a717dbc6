// Market analysis domain
pub mod market;

// Portfolio valuation domain
pub mod trading;

// Trend alert evaluation
pub mod alerts;

// Snapshot store read interface
pub mod repositories;

// Domain-specific error types
pub mod errors;
