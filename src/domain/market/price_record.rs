use super::series::ReturnSeries;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// One trading day for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        Self { date, open, close }
    }

    /// Fractional intraday change `(close - open) / open`.
    ///
    /// Computed in f64 so a zero open yields an infinite or NaN return
    /// instead of an error.
    pub fn intraday_return(&self) -> f64 {
        let open = self.open.to_f64().unwrap_or(f64::NAN);
        let close = self.close.to_f64().unwrap_or(f64::NAN);
        (close - open) / open
    }
}

/// A tradable entity and its daily price history, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    pub name: String,
    pub category: Option<String>,
    pub records: Vec<PriceRecord>,
}

impl EntitySeries {
    /// Creates a series, sorting the records by date.
    pub fn new(name: impl Into<String>, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            name: name.into(),
            category: None,
            records,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One intraday return per record, in date order.
    pub fn returns(&self) -> ReturnSeries {
        self.records
            .iter()
            .map(PriceRecord::intraday_return)
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_intraday_return() {
        let record = PriceRecord::new(day(2), dec!(100), dec!(102));
        assert!((record.intraday_return() - 0.02).abs() < 1e-12);

        let down = PriceRecord::new(day(3), dec!(50), dec!(49));
        assert!((down.intraday_return() + 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_zero_open_is_not_finite() {
        let flat = PriceRecord::new(day(2), dec!(0), dec!(0));
        assert!(flat.intraday_return().is_nan());

        let jump = PriceRecord::new(day(2), dec!(0), dec!(1));
        assert!(jump.intraday_return().is_infinite());
    }

    #[test]
    fn test_series_sorted_by_date() {
        let series = EntitySeries::new(
            "AAPL",
            vec![
                PriceRecord::new(day(4), dec!(10), dec!(11)),
                PriceRecord::new(day(2), dec!(10), dec!(9)),
                PriceRecord::new(day(3), dec!(10), dec!(10)),
            ],
        )
        .with_category("tech");

        let dates: Vec<_> = series.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);
        assert_eq!(series.category.as_deref(), Some("tech"));

        let returns = series.returns();
        assert_eq!(returns.len(), 3);
        assert!((returns.values()[0] + 0.1).abs() < 1e-12);
        assert_eq!(returns.values()[1], 0.0);
        assert!((returns.values()[2] - 0.1).abs() < 1e-12);
    }
}
