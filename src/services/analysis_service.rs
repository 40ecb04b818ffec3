use thiserror::Error;
use uuid::Uuid;

use crate::models::WorkoutAnalysis;
use crate::services::fit_parser::RecordSeries;

pub const LLM_FEEDBACK_PLACEHOLDER: &str = "This is a placeholder for LLM feedback.";
pub const ANALYSIS_GRAPH_PLACEHOLDER_URL: &str = "https://example.com/analysis_graph.png";
const UNKNOWN_SPORT: &str = "unknown";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Workout file contains no timestamped records")]
    NoRecords,
}

/// Assemble the placeholder analysis for a decoded workout file.
///
/// No statistics are computed: the record stream is echoed back alongside
/// canned feedback text.
pub fn build_analysis(
    username: &str,
    file_id: Uuid,
    series: RecordSeries,
) -> Result<WorkoutAnalysis, AnalysisError> {
    let timestamps: Vec<String> = series
        .timestamps
        .iter()
        .map(|ts| ts.to_rfc3339())
        .collect();

    let date = timestamps.first().cloned().ok_or(AnalysisError::NoRecords)?;
    let record_count = timestamps.len();

    Ok(WorkoutAnalysis {
        user: username.to_string(),
        analysis: format!("Analysis for workout on {} for {} records.", date, record_count),
        date,
        duration: record_count as i64,
        workout_type: series.sport.unwrap_or_else(|| UNKNOWN_SPORT.to_string()),
        details: format!("FIT file {}", file_id),
        llm_feedback: LLM_FEEDBACK_PLACEHOLDER.to_string(),
        analysis_graph_url: ANALYSIS_GRAPH_PLACEHOLDER_URL.to_string(),
        timestamps,
        heart_rate: series.heart_rate,
        speed: series.speed,
        distance: series.distance,
        calories: series.calories,
        power: series.power,
    })
}
