// Price records and derived return series
pub mod market;

// Partitioning and moment calculations
pub mod statistics;

// Windowed correlation matrices
pub mod correlation;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
