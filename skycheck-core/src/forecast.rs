use crate::model::ForecastEntry;

/// The provider reports one sample every three hours.
pub const SAMPLES_PER_DAY: usize = 8;

/// Reduce a 3-hourly feed to one sample per day by keeping indices
/// 0, 8, 16, ...
pub fn daily_entries(samples: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
    samples.into_iter().step_by(SAMPLES_PER_DAY).collect()
}
