// Market analysis domain
pub mod correlation;
pub mod indicator_config;
pub mod indicators;
pub mod overview;
pub mod rankings;
pub mod series;
pub mod types;
