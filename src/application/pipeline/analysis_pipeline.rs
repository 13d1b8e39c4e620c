use super::report::{AnalysisReport, EntitySummary, WindowSummary};
use crate::application::correlation::WindowedCorrelationBuilder;
use crate::application::normalization::ReturnNormalizer;
use crate::config::{AnalysisConfig, RenderFormat};
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::market::{EntityUniverse, NormalizedUniverse, ReturnUniverse, returns_by_entity};
use crate::domain::ports::{MatrixRenderer, PriceSeriesLoader};
use crate::infrastructure::loader::CsvDirectoryLoader;
use crate::infrastructure::rendering::{CsvMatrixRenderer, PpmHeatmapRenderer};
use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything computed before rendering.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub entities: EntityUniverse,
    pub returns: ReturnUniverse,
    pub normalized: NormalizedUniverse,
    pub matrices: Vec<CorrelationMatrix>,
}

/// Load → returns → normalize → correlate → render.
pub struct AnalysisPipeline {
    loader: Arc<dyn PriceSeriesLoader>,
    renderers: Vec<Arc<dyn MatrixRenderer>>,
    normalizer: ReturnNormalizer,
    builder: WindowedCorrelationBuilder,
}

impl AnalysisPipeline {
    pub fn new(
        loader: Arc<dyn PriceSeriesLoader>,
        normalizer: ReturnNormalizer,
        builder: WindowedCorrelationBuilder,
    ) -> Self {
        Self {
            loader,
            renderers: Vec::new(),
            normalizer,
            builder,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn MatrixRenderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Wires the CSV directory loader and the configured renderers.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let normalizer = ReturnNormalizer::new(config.chunk_count)
            .with_nan_policy(config.nan_policy)
            .with_parallelism(config.parallel);
        let builder =
            WindowedCorrelationBuilder::new(config.window_length).with_parallelism(config.parallel);
        let loader = Arc::new(CsvDirectoryLoader::new(&config.data_dir));

        let mut pipeline = Self::new(loader, normalizer, builder);
        if matches!(config.render_format, RenderFormat::Ppm | RenderFormat::Both) {
            pipeline = pipeline.with_renderer(Arc::new(PpmHeatmapRenderer::new(
                &config.output_dir,
                config.cell_size,
            )));
        }
        if matches!(config.render_format, RenderFormat::Csv | RenderFormat::Both) {
            pipeline = pipeline.with_renderer(Arc::new(CsvMatrixRenderer::new(&config.output_dir)));
        }
        pipeline
    }

    pub fn renderer_names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Runs every stage except rendering.
    pub fn compute(&self) -> Result<AnalysisOutcome> {
        let entities = self
            .loader
            .load_entities()
            .context("Failed to load price series")?;
        info!("Loaded {} entities", entities.len());

        let returns = returns_by_entity(&entities);

        let normalized = self
            .normalizer
            .normalize_all(&returns)
            .context("Failed to normalize returns")?;
        info!(
            "Normalized returns (chunk_count={}, nan_policy={})",
            self.normalizer.chunk_count(),
            self.normalizer.nan_policy()
        );

        let matrices = self
            .builder
            .build_matrices(&normalized)
            .context("Failed to build correlation matrices")?;
        info!(
            "Built {} correlation matrices (window_length={})",
            matrices.len(),
            self.builder.window_length()
        );

        Ok(AnalysisOutcome {
            entities,
            returns,
            normalized,
            matrices,
        })
    }

    /// Renders every matrix with every renderer; artifacts are grouped per window.
    pub fn render(&self, matrices: &[CorrelationMatrix]) -> Result<Vec<Vec<PathBuf>>> {
        matrices
            .par_iter()
            .map(|matrix| {
                self.renderers
                    .iter()
                    .map(|renderer| {
                        renderer.render(matrix).with_context(|| {
                            format!("{} renderer failed for {}", renderer.name(), matrix.label())
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    pub fn run(&self) -> Result<AnalysisReport> {
        let outcome = self.compute()?;
        let artifacts = self.render(&outcome.matrices)?;
        if !self.renderers.is_empty() {
            info!(
                "Rendered {} windows with {:?}",
                outcome.matrices.len(),
                self.renderer_names()
            );
        }

        let (reference_entity, reference_length) = outcome
            .normalized
            .iter()
            .next()
            .map(|(name, series)| (name.clone(), series.len()))
            .unwrap_or_default();

        Ok(AnalysisReport {
            generated_at: Utc::now(),
            chunk_count: self.normalizer.chunk_count(),
            window_length: self.builder.window_length(),
            nan_policy: self.normalizer.nan_policy(),
            reference_entity,
            reference_length,
            entities: EntitySummary::collect(&outcome.entities, &outcome.normalized),
            windows: outcome
                .matrices
                .iter()
                .zip(artifacts)
                .map(|(matrix, paths)| WindowSummary::from_matrix(matrix, paths))
                .collect(),
        })
    }
}
