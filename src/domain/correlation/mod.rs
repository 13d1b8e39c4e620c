pub mod matrix;

pub use matrix::CorrelationMatrix;
