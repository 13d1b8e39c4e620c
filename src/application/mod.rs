// Two-stage return normalization
pub mod normalization;

// Windowed correlation matrices
pub mod correlation;

// Load → normalize → correlate → render orchestration
pub mod pipeline;
