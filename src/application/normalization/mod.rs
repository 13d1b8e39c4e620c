pub mod return_normalizer;

pub use return_normalizer::{DEFAULT_CHUNK_COUNT, ReturnNormalizer, normalize_returns};
