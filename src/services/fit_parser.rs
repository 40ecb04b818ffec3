use chrono::{DateTime, Utc};
use fitparser::profile::field_types::MesgNum;
use fitparser::Value;
use thiserror::Error;

/// Byte offset and value of the `.FIT` signature in a file header
const FIT_SIGNATURE_OFFSET: usize = 8;
const FIT_SIGNATURE: &[u8; 4] = b".FIT";

#[derive(Error, Debug)]
pub enum FitParseError {
    #[error("Not a FIT file")]
    NotFit,
    #[error("Failed to decode FIT file: {0}")]
    Decode(String),
}

/// `record` message fields demultiplexed into parallel arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub heart_rate: Vec<i64>,
    pub speed: Vec<f64>,
    pub distance: Vec<f64>,
    pub power: Vec<i64>,
    /// Last cumulative calorie count seen
    pub calories: Option<i64>,
    pub sport: Option<String>,
}

impl RecordSeries {
    /// Append the fields of one `record` message
    pub fn push_record<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut speed = None;
        let mut enhanced_speed = None;

        for (name, value) in fields {
            match name {
                "timestamp" => {
                    if let Value::Timestamp(ts) = value {
                        self.timestamps.push(ts.with_timezone(&Utc));
                    }
                }
                "heart_rate" => {
                    if let Some(v) = as_i64(value) {
                        self.heart_rate.push(v);
                    }
                }
                "speed" => speed = as_f64(value),
                "enhanced_speed" => enhanced_speed = as_f64(value),
                "distance" => {
                    if let Some(v) = as_f64(value) {
                        self.distance.push(v);
                    }
                }
                "power" => {
                    if let Some(v) = as_i64(value) {
                        self.power.push(v);
                    }
                }
                "calories" => {
                    if let Some(v) = as_i64(value) {
                        self.calories = Some(v);
                    }
                }
                _ => {}
            }
        }

        // Newer devices only write the enhanced field
        if let Some(v) = speed.or(enhanced_speed) {
            self.speed.push(v);
        }
    }

    /// Remember the sport from a `sport` or `session` message
    pub fn push_sport<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        if self.sport.is_some() {
            return;
        }
        self.sport = fields.into_iter().find_map(|(name, value)| match (name, value) {
            ("sport", Value::String(sport)) => Some(sport.clone()),
            _ => None,
        });
    }
}

/// Cheap header check performed before accepting an upload
pub fn looks_like_fit(bytes: &[u8]) -> bool {
    let header_size = match bytes.first() {
        Some(&size) => size as usize,
        None => return false,
    };

    (header_size == 12 || header_size == 14)
        && bytes.len() >= header_size
        && &bytes[FIT_SIGNATURE_OFFSET..FIT_SIGNATURE_OFFSET + FIT_SIGNATURE.len()] == FIT_SIGNATURE
}

/// Decode a FIT file and collect its record stream
pub fn parse_fit(bytes: &[u8]) -> Result<RecordSeries, FitParseError> {
    if !looks_like_fit(bytes) {
        return Err(FitParseError::NotFit);
    }

    let records = fitparser::from_bytes(bytes).map_err(|e| FitParseError::Decode(e.to_string()))?;

    let mut series = RecordSeries::default();
    for record in &records {
        let fields = record.fields().iter().map(|field| (field.name(), field.value()));
        match record.kind() {
            MesgNum::Record => series.push_record(fields),
            MesgNum::Sport | MesgNum::Session => series.push_sport(fields),
            _ => {}
        }
    }

    tracing::debug!(
        "Decoded FIT file: {} messages, {} timestamped records",
        records.len(),
        series.timestamps.len()
    );

    Ok(series)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Byte(v) | Value::Enum(v) | Value::UInt8(v) | Value::UInt8z(v) => Some(i64::from(*v)),
        Value::SInt8(v) => Some(i64::from(*v)),
        Value::SInt16(v) => Some(i64::from(*v)),
        Value::UInt16(v) | Value::UInt16z(v) => Some(i64::from(*v)),
        Value::SInt32(v) => Some(i64::from(*v)),
        Value::UInt32(v) | Value::UInt32z(v) => Some(i64::from(*v)),
        Value::SInt64(v) => Some(*v),
        Value::UInt64(v) | Value::UInt64z(v) => i64::try_from(*v).ok(),
        Value::Float32(v) if v.is_finite() => Some(v.round() as i64),
        Value::Float64(v) if v.is_finite() => Some(v.round() as i64),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(f64::from(*v)),
        Value::Float64(v) => Some(*v),
        other => as_i64(other).map(|v| v as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn ts(secs: i64) -> Value {
        Value::Timestamp(Local.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn test_record_fields_are_demultiplexed() {
        let mut series = RecordSeries::default();

        let first = [
            ("timestamp", ts(1_700_000_000)),
            ("heart_rate", Value::UInt8(142)),
            ("speed", Value::Float64(8.25)),
            ("distance", Value::Float64(12.5)),
            ("power", Value::UInt16(231)),
            ("cadence", Value::UInt8(90)),
        ];
        let second = [
            ("timestamp", ts(1_700_000_001)),
            ("heart_rate", Value::UInt8(144)),
            ("calories", Value::UInt16(37)),
        ];

        series.push_record(first.iter().map(|(n, v)| (*n, v)));
        series.push_record(second.iter().map(|(n, v)| (*n, v)));

        assert_eq!(series.timestamps.len(), 2);
        assert_eq!(series.timestamps[0].timestamp(), 1_700_000_000);
        assert_eq!(series.heart_rate, vec![142, 144]);
        assert_eq!(series.speed, vec![8.25]);
        assert_eq!(series.distance, vec![12.5]);
        assert_eq!(series.power, vec![231]);
        assert_eq!(series.calories, Some(37));
    }

    #[test]
    fn test_enhanced_speed_is_a_fallback() {
        let mut series = RecordSeries::default();

        let both = [("speed", Value::Float64(3.0)), ("enhanced_speed", Value::Float64(3.001))];
        let enhanced_only = [("enhanced_speed", Value::Float64(4.5))];

        series.push_record(both.iter().map(|(n, v)| (*n, v)));
        series.push_record(enhanced_only.iter().map(|(n, v)| (*n, v)));

        assert_eq!(series.speed, vec![3.0, 4.5]);
    }

    #[test]
    fn test_invalid_values_are_skipped() {
        let mut series = RecordSeries::default();
        let fields = [
            ("heart_rate", Value::Array(vec![])),
            ("power", Value::String("n/a".to_string())),
            ("timestamp", Value::UInt32(5)),
        ];

        series.push_record(fields.iter().map(|(n, v)| (*n, v)));

        assert_eq!(series, RecordSeries::default());
    }

    #[test]
    fn test_first_sport_wins() {
        let mut series = RecordSeries::default();
        let sport = [("sport", Value::String("cycling".to_string()))];
        let session = [("sport", Value::String("running".to_string()))];

        series.push_sport(sport.iter().map(|(n, v)| (*n, v)));
        series.push_sport(session.iter().map(|(n, v)| (*n, v)));

        assert_eq!(series.sport.as_deref(), Some("cycling"));
    }

    #[test]
    fn test_header_sniffing() {
        let mut header = vec![14u8, 0x20, 0x2D, 0x08, 0, 0, 0, 0];
        header.extend_from_slice(b".FIT");
        header.extend_from_slice(&[0, 0]);

        assert!(looks_like_fit(&header));
        assert!(!looks_like_fit(b""));
        assert!(!looks_like_fit(b"just some text that is long"));
        assert!(!looks_like_fit(&header[..10]));
    }

    #[test]
    fn test_parse_rejects_non_fit_bytes() {
        assert!(matches!(parse_fit(b"hello world, not fit"), Err(FitParseError::NotFit)));
    }
}
