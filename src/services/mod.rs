// Business logic services

pub mod analysis_service;
pub mod fit_parser;
pub mod s3_storage;
pub mod workout_storage;

pub use analysis_service::{build_analysis, AnalysisError};
pub use fit_parser::{looks_like_fit, parse_fit, FitParseError, RecordSeries};
pub use s3_storage::S3WorkoutStorage;
pub use workout_storage::{workout_key, MemoryWorkoutStorage, StorageError, WorkoutStorage};
