pub mod traits;

// Vendor implementations
pub mod alphavantage;
