pub mod color_scale;
pub mod csv_matrix;
pub mod ppm_heatmap;

pub use color_scale::BluesColorScale;
pub use csv_matrix::CsvMatrixRenderer;
pub use ppm_heatmap::PpmHeatmapRenderer;
