use thiserror::Error;

/// Errors raised while validating a raw price series
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("Series for {id} is empty")]
    Empty { id: String },

    #[error("Series for {id} has {actual} points, need at least {required}")]
    InsufficientHistory {
        id: String,
        required: usize,
        actual: usize,
    },

    #[error("Non-positive price {price} at timestamp {timestamp} in series {id}")]
    NonPositivePrice {
        id: String,
        timestamp: i64,
        price: f64,
    },
}

/// Errors raised by cross-asset correlation
#[derive(Debug, Error, PartialEq)]
pub enum CorrelationError {
    #[error("Only {aligned} timestamps shared across all series, need at least {required}")]
    InsufficientOverlap { aligned: usize, required: usize },
}

/// Errors raised by portfolio valuation
#[derive(Debug, Error, PartialEq)]
pub enum PortfolioError {
    #[error("No current price available for held asset {id}")]
    UnknownAsset { id: String },
}

/// Errors raised by snapshot ranking
#[derive(Debug, Error, PartialEq)]
pub enum RankingError {
    #[error("Field '{field}' is absent in every snapshot row")]
    MissingField { field: &'static str },
}
