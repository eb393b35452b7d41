//! Bounded Time-Series Buffer
//!
//! Fixed-capacity FIFO store of `(label, value)` samples backing one chart
//! series. Appending past capacity evicts exactly one sample from the front.
//! Capacity is fixed for the lifetime of the buffer; a different window size
//! means building a new buffer.

use crate::error::BufferError;
use serde::Serialize;
use std::collections::VecDeque;

/// One tracked metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    label: String,
    capacity: usize,
}

impl Series {
    /// Create a series descriptor, rejecting a zero capacity
    pub fn new(label: impl Into<String>, capacity: usize) -> Result<Self, BufferError> {
        let label = label.into();
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity(label));
        }
        Ok(Self { label, capacity })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A single timestamped value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Display label for the x axis (usually HH:MM:SS)
    pub label: String,
    pub value: f64,
}

/// Ordered, bounded sequence of samples for one series
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    series: Series,
    samples: VecDeque<Sample>,
}

impl TimeSeriesBuffer {
    pub fn new(series: Series) -> Self {
        let samples = VecDeque::with_capacity(series.capacity + 1);
        Self { series, samples }
    }

    /// Shorthand for `TimeSeriesBuffer::new(Series::new(label, capacity)?)`
    pub fn with_capacity(label: impl Into<String>, capacity: usize) -> Result<Self, BufferError> {
        Ok(Self::new(Series::new(label, capacity)?))
    }

    /// Append one sample, evicting the oldest when over capacity.
    ///
    /// Labels are not required to be unique.
    pub fn append(&mut self, label: impl Into<String>, value: f64) {
        self.samples.push_back(Sample {
            label: label.into(),
            value,
        });
        if self.samples.len() > self.series.capacity {
            self.samples.pop_front();
        }
    }

    /// Owned copy of the current samples, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    /// Read-only view of the current samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn label(&self) -> &str {
        self.series.label()
    }

    pub fn capacity(&self) -> usize {
        self.series.capacity()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn first_label(&self) -> Option<&str> {
        self.samples.front().map(|s| s.label.as_str())
    }

    pub fn last_label(&self) -> Option<&str> {
        self.samples.back().map(|s| s.label.as_str())
    }

    /// Largest value currently held, `None` when empty
    pub fn max_value(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.value)
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// `(x, y)` pairs for plotting, x being the position in the window
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(buffer: &TimeSeriesBuffer) -> Vec<f64> {
        buffer.samples().map(|s| s.value).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Series::new("cpu-usage", 0).unwrap_err();
        assert_eq!(err, BufferError::ZeroCapacity("cpu-usage".to_string()));
        assert!(TimeSeriesBuffer::with_capacity("cpu-usage", 0).is_err());
    }

    #[test]
    fn test_capacity_three_keeps_last_three() {
        let mut buffer = TimeSeriesBuffer::with_capacity("cpu-usage", 3).unwrap();
        for (i, v) in [60.0, 70.0, 80.0, 90.0].into_iter().enumerate() {
            buffer.append(format!("00:00:0{}", i), v);
        }
        assert_eq!(values(&buffer), vec![70.0, 80.0, 90.0]);
        assert_eq!(buffer.first_label(), Some("00:00:01"));
        assert_eq!(buffer.last_label(), Some("00:00:03"));
    }

    #[test]
    fn test_fifo_property_for_many_lengths() {
        for capacity in 1..=8 {
            for appended in 0..=20usize {
                let mut buffer = TimeSeriesBuffer::with_capacity("s", capacity).unwrap();
                for i in 0..appended {
                    buffer.append(i.to_string(), i as f64);
                    assert!(buffer.len() <= capacity);
                }
                let start = appended.saturating_sub(capacity);
                let expected: Vec<f64> = (start..appended).map(|i| i as f64).collect();
                assert_eq!(
                    values(&buffer),
                    expected,
                    "capacity={} appended={}",
                    capacity,
                    appended
                );
            }
        }
    }

    #[test]
    fn test_duplicate_labels_permitted() {
        let mut buffer = TimeSeriesBuffer::with_capacity("mem", 4).unwrap();
        buffer.append("12:00:00", 1.0);
        buffer.append("12:00:00", 2.0);
        assert_eq!(buffer.len(), 2);
        assert_eq!(values(&buffer), vec![1.0, 2.0]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut buffer = TimeSeriesBuffer::with_capacity("disk", 2).unwrap();
        buffer.append("a", 1.0);
        let snapshot = buffer.snapshot();
        buffer.append("b", 2.0);
        buffer.append("c", 3.0);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].value, 1.0);
        assert_eq!(values(&buffer), vec![2.0, 3.0]);
    }

    #[test]
    fn test_points_and_max() {
        let mut buffer = TimeSeriesBuffer::with_capacity("net", 5).unwrap();
        assert_eq!(buffer.max_value(), None);
        buffer.append("a", 3.0);
        buffer.append("b", 7.5);
        buffer.append("c", 1.0);
        assert_eq!(buffer.max_value(), Some(7.5));
        assert_eq!(buffer.points(), vec![(0.0, 3.0), (1.0, 7.5), (2.0, 1.0)]);
        assert_eq!(buffer.latest().map(|s| s.value), Some(1.0));
    }
}
