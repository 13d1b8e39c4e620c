pub mod price_record;
pub mod series;

pub use price_record::{EntitySeries, PriceRecord};
pub use series::{
    EntityUniverse, NormalizedReturnSeries, NormalizedUniverse, ReturnSeries, ReturnUniverse,
    returns_by_entity,
};
