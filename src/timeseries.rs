// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Lazy access to the samples referenced by [`Timeseries`] entities.
//!
//! A series file is a CSV file without a header and with one row per
//! sample.  The sample is the last field of each row, so files that carry
//! an hour column before the value are read the same way.  Nothing is read
//! until one of these methods is called, and source files are never
//! rewritten: scaling happens in memory.

use std::path::Path;

use csv::ReaderBuilder;

use crate::model::Timeseries;
use crate::Error;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// The span of time a series covers, as given by its number of samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesPeriod {
    /// One day of hourly, minutely or secondly samples.
    Daily,
    /// One year, at whatever resolution the number of samples gives.
    Yearly,
}

impl SeriesPeriod {
    /// Classifies a series by its number of samples.
    pub fn from_points(points: usize) -> Self {
        match points {
            24 | 1_440 | 86_400 => Self::Daily,
            _ => Self::Yearly,
        }
    }

    /// Length of the period, in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Daily => SECONDS_PER_DAY,
            Self::Yearly => SECONDS_PER_YEAR,
        }
    }

    /// Seconds between samples when `points` samples cover the period, or
    /// `None` for an empty series.
    pub fn interval(&self, points: usize) -> Option<f64> {
        (points > 0).then(|| self.seconds() / points as f64)
    }
}

impl Timeseries {
    /// The file holding the samples.
    pub fn path(&self) -> Result<&Path, Error> {
        self.data_location
            .as_deref()
            .map(Path::new)
            .ok_or_else(|| {
                Error::invalid_attribute(format!(
                    "Timeseries `{}` has no data location.",
                    self.name
                ))
            })
    }

    /// Number of samples in the file.
    pub fn points(&self) -> Result<usize, Error> {
        let mut count = 0;
        for record in self.reader()?.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    /// The samples as stored in the file.
    pub fn values(&self) -> Result<Vec<f64>, Error> {
        self.reader()?
            .records()
            .enumerate()
            .map(|(row, record)| {
                let record = record?;
                let field = record.iter().last().unwrap_or_default();
                field.trim().parse::<f64>().map_err(|_| {
                    Error::parse(format!(
                        "{}, row {}: `{}` is not a number.",
                        self.name,
                        row + 1,
                        field
                    ))
                })
            })
            .collect()
    }

    /// The samples multiplied by `scale_factor`.  An unset scale factor
    /// leaves the samples unchanged.
    pub fn scaled_values(&self) -> Result<Vec<f64>, Error> {
        let values = self.values()?;
        match self.scale_factor {
            Some(factor) if factor != 1.0 => {
                tracing::debug!("Scaling timeseries {} by {}.", self.name, factor);
                Ok(values.into_iter().map(|v| v * factor).collect())
            }
            _ => Ok(values),
        }
    }

    /// The period the samples cover.
    pub fn period(&self) -> Result<SeriesPeriod, Error> {
        Ok(SeriesPeriod::from_points(self.points()?))
    }

    /// Seconds between samples: the `interval` attribute when set, and
    /// otherwise the interval implied by the number of samples.
    pub fn sampling_interval(&self) -> Result<Option<f64>, Error> {
        if let Some(interval) = self.interval {
            return Ok(Some(interval));
        }
        let points = self.points()?;
        Ok(SeriesPeriod::from_points(points).interval(points))
    }

    fn reader(&self) -> Result<csv::Reader<std::fs::File>, Error> {
        Ok(ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(self.path()?)?)
    }
}
