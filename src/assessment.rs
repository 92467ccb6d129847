//! Mental-health questionnaire
//!
//! Catalog, scoring, the downloadable report and dashboard aggregation.

mod catalog;
mod report;
mod scorer;
mod summary;

#[cfg(test)]
mod proptests;

#[allow(unused_imports)] // Public API re-exports
pub use catalog::{option_label, Category, ANSWER_OPTIONS, MAX_ANSWER, QUESTIONS, QUESTION_COUNT};
pub use report::{render_report, REPORT_FILE_NAME};
#[cfg(test)]
pub use scorer::score;
#[allow(unused_imports)]
pub use scorer::{
    score_answers, Answers, AssessmentError, ScoreReport, SeverityTier,
    TIMESTAMP_FORMAT,
};
#[allow(unused_imports)]
pub use summary::{
    analyze_test_results, dashboard_summary, BucketCounts, DailyCount, DashboardBucket,
    DashboardSummary, ScorePoint,
};
