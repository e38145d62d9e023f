//! Temporal helpers for annotation records.
//!
//! Offsets are stored as separate seconds/microseconds/nanos parts, any of
//! which may be missing. A record without the requested field resolves to
//! zero seconds so that detectors keep going on partial exports.

use std::fmt;

use abcd_models::{
    LabelFrame, LabelSegment, TextFrame, TextSegment, TimeOffset, TimeSpan, TimestampedObject,
    Track, WordInfo,
};
use tracing::debug;

/// Named time field on an annotation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    StartTimeOffset,
    EndTimeOffset,
    StartTime,
    EndTime,
    TimeOffset,
}

impl TimeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeField::StartTimeOffset => "start_time_offset",
            TimeField::EndTimeOffset => "end_time_offset",
            TimeField::StartTime => "start_time",
            TimeField::EndTime => "end_time",
            TimeField::TimeOffset => "time_offset",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record that carries one or more time offsets.
pub trait Timed {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset>;
}

/// Seconds represented by an offset; missing parts count as zero.
pub fn offset_seconds(offset: &TimeOffset) -> f64 {
    offset.seconds.unwrap_or(0.0)
        + offset.microseconds.unwrap_or(0.0) / 1e6
        + offset.nanos.unwrap_or(0.0) / 1e9
}

/// Seconds at `field` of `record`, or 0 when the field is absent.
pub fn time_seconds<T: Timed + ?Sized>(record: &T, field: TimeField) -> f64 {
    match record.time_field(field) {
        Some(offset) => offset_seconds(offset),
        None => {
            debug!(field = %field, "Time field missing on annotation record, using 0");
            0.0
        }
    }
}

/// Milliseconds at `field` of `record`.
pub fn time_millis<T: Timed + ?Sized>(record: &T, field: TimeField) -> f64 {
    time_seconds(record, field) * 1000.0
}

/// Duration of a span, never negative.
pub fn span_duration(span: &TimeSpan) -> f64 {
    let start = time_seconds(span, TimeField::StartTimeOffset);
    let end = time_seconds(span, TimeField::EndTimeOffset);
    (end - start).max(0.0)
}

impl Timed for TimeSpan {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        match field {
            TimeField::StartTimeOffset => self.start_time_offset.as_ref(),
            TimeField::EndTimeOffset => self.end_time_offset.as_ref(),
            _ => None,
        }
    }
}

impl Timed for Option<TimeSpan> {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        self.as_ref().and_then(|span| span.time_field(field))
    }
}

impl Timed for Track {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        self.segment.time_field(field)
    }
}

impl Timed for TextSegment {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        self.segment.time_field(field)
    }
}

impl Timed for LabelSegment {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        self.segment.time_field(field)
    }
}

impl Timed for WordInfo {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        match field {
            TimeField::StartTime => self.start_time.as_ref(),
            TimeField::EndTime => self.end_time.as_ref(),
            _ => None,
        }
    }
}

impl Timed for TimestampedObject {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        match field {
            TimeField::TimeOffset => self.time_offset.as_ref(),
            _ => None,
        }
    }
}

impl Timed for TextFrame {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        match field {
            TimeField::TimeOffset => self.time_offset.as_ref(),
            _ => None,
        }
    }
}

impl Timed for LabelFrame {
    fn time_field(&self, field: TimeField) -> Option<&TimeOffset> {
        match field {
            TimeField::TimeOffset => self.time_offset.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_seconds_sums_parts() {
        let offset = TimeOffset {
            seconds: Some(2.0),
            microseconds: Some(250_000.0),
            nanos: Some(5_000_000.0),
        };
        assert!((offset_seconds(&offset) - 2.255).abs() < 1e-9);
    }

    #[test]
    fn test_missing_parts_are_zero() {
        let offset = TimeOffset {
            seconds: None,
            microseconds: None,
            nanos: Some(500_000_000.0),
        };
        assert!((offset_seconds(&offset) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_is_zero() {
        let span = TimeSpan {
            start_time_offset: None,
            end_time_offset: Some(TimeOffset::from_secs(3.0)),
        };
        assert_eq!(time_seconds(&span, TimeField::StartTimeOffset), 0.0);
        assert_eq!(time_seconds(&span, TimeField::TimeOffset), 0.0);
        assert!((time_millis(&span, TimeField::EndTimeOffset) - 3000.0).abs() < 1e-6);
    }

    #[test]
    fn test_track_without_segment() {
        let track = Track::default();
        assert_eq!(time_seconds(&track, TimeField::StartTimeOffset), 0.0);
    }

    #[test]
    fn test_span_duration_clamps() {
        assert!((span_duration(&TimeSpan::new(1.0, 2.5)) - 1.5).abs() < 1e-9);
        assert_eq!(span_duration(&TimeSpan::new(3.0, 2.0)), 0.0);
    }
}
