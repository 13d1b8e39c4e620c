// CSV price history loading
pub mod loader;

// Heatmap and grid output
pub mod rendering;
