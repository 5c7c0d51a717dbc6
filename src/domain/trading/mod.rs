// Portfolio valuation domain
pub mod portfolio;
