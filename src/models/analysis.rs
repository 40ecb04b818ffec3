use serde::{Deserialize, Serialize};

/// Response from `POST /upload/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
}

/// Query for `POST /analyze/`
#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub file_id: String,
}

/// Analysis payload returned for an uploaded FIT file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutAnalysis {
    pub user: String,
    pub date: String,
    pub duration: i64,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub details: String,
    pub analysis: String,
    pub llm_feedback: String,
    pub analysis_graph_url: String,
    pub timestamps: Vec<String>,
    pub heart_rate: Vec<i64>,
    pub speed: Vec<f64>,
    pub distance: Vec<f64>,
    pub calories: Option<i64>,
    pub power: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
