pub mod windowed_builder;

pub use windowed_builder::{
    DEFAULT_WINDOW_LENGTH, WindowedCorrelationBuilder, WindowedPartition,
    build_correlation_matrices,
};
