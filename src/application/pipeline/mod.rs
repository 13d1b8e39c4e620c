pub mod analysis_pipeline;
pub mod report;

pub use analysis_pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use report::{AnalysisReport, WindowSummary};
