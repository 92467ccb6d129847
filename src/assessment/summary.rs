//! Dashboard aggregation over stored reports
//!
//! The coarse buckets here are a separate classification from
//! [`SeverityTier`](super::SeverityTier) and use different breakpoints.

use super::scorer::{count_to_f64, ScoreReport};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse dashboard bucket for a stored report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardBucket {
    Stres,
    Depresi,
    Kecemasan,
    Burnout,
}

impl DashboardBucket {
    #[cfg(test)]
    pub const ALL: [DashboardBucket; 4] = [
        DashboardBucket::Stres,
        DashboardBucket::Depresi,
        DashboardBucket::Kecemasan,
        DashboardBucket::Burnout,
    ];

    pub fn for_percentage(percentage: f64) -> Self {
        if percentage < 25.0 {
            DashboardBucket::Stres
        } else if percentage < 50.0 {
            DashboardBucket::Depresi
        } else if percentage < 75.0 {
            DashboardBucket::Kecemasan
        } else {
            DashboardBucket::Burnout
        }
    }
}

/// Number of reports per bucket; every bucket is present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    #[serde(rename = "Stres")]
    pub stres: u32,
    #[serde(rename = "Depresi")]
    pub depresi: u32,
    #[serde(rename = "Kecemasan")]
    pub kecemasan: u32,
    #[serde(rename = "Burnout")]
    pub burnout: u32,
}

impl BucketCounts {
    #[cfg(test)]
    pub fn get(&self, bucket: DashboardBucket) -> u32 {
        match bucket {
            DashboardBucket::Stres => self.stres,
            DashboardBucket::Depresi => self.depresi,
            DashboardBucket::Kecemasan => self.kecemasan,
            DashboardBucket::Burnout => self.burnout,
        }
    }

    fn bump(&mut self, bucket: DashboardBucket) {
        let slot = match bucket {
            DashboardBucket::Stres => &mut self.stres,
            DashboardBucket::Depresi => &mut self.depresi,
            DashboardBucket::Kecemasan => &mut self.kecemasan,
            DashboardBucket::Burnout => &mut self.burnout,
        };
        *slot += 1;
    }

    #[cfg(test)]
    pub fn total(&self) -> u32 {
        DashboardBucket::ALL.iter().map(|&b| self.get(b)).sum()
    }
}

/// Classify stored reports into the four dashboard buckets
pub fn analyze_test_results(reports: &[ScoreReport]) -> BucketCounts {
    let mut counts = BucketCounts::default();
    for report in reports {
        counts.bump(DashboardBucket::for_percentage(report.percentage));
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub percentage: f64,
}

/// Headline numbers and trends for the dashboard screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub buckets: BucketCounts,
    pub total_tests: usize,
    pub average_percentage: Option<f64>,
    pub latest_percentage: Option<f64>,
    /// Latest minus average
    pub latest_change: Option<f64>,
    pub tests_per_day: Vec<DailyCount>,
    pub score_trend: Vec<ScorePoint>,
}

pub fn dashboard_summary(reports: &[ScoreReport]) -> DashboardSummary {
    let total_tests = reports.len();

    let average_percentage = (!reports.is_empty()).then(|| {
        reports.iter().map(|r| r.percentage).sum::<f64>() / count_to_f64(total_tests)
    });
    let latest_percentage = reports.last().map(|r| r.percentage);
    let latest_change = latest_percentage
        .zip(average_percentage)
        .map(|(latest, average)| latest - average);

    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for report in reports {
        *per_day.entry(report.timestamp.date()).or_default() += 1;
    }
    let tests_per_day = per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    // Stable sort keeps insertion order within a day
    let mut score_trend: Vec<ScorePoint> = reports
        .iter()
        .map(|r| ScorePoint {
            date: r.timestamp.date(),
            percentage: r.percentage,
        })
        .collect();
    score_trend.sort_by_key(|p| p.date);

    DashboardSummary {
        buckets: analyze_test_results(reports),
        total_tests,
        average_percentage,
        latest_percentage,
        latest_change,
        tests_per_day,
        score_trend,
    }
}
