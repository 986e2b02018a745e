//! Read-only rollups over the eligibility log

use futures::try_join;

use crate::db::{DbError, EligibilityLogRepository};
use crate::model::{AnalyticsSummary, RecentCheck, VerdictCount, VolumeCount};

/// Rolling window for top-N rollups, in days
const TOP_N_WINDOW_DAYS: i32 = 30;
const TOP_N_LIMIT: i64 = 5;

const DEFAULT_RECENT_LIMIT: i64 = 20;
const MAX_RECENT_LIMIT: i64 = 100;

/// Read-side service for operational dashboards
#[derive(Clone)]
pub struct AnalyticsService {
    log: EligibilityLogRepository,
}

impl AnalyticsService {
    pub fn new(log: EligibilityLogRepository) -> Self {
        Self { log }
    }

    /// Aggregate view over the whole log; zero-safe when empty
    pub async fn summary(&self) -> Result<AnalyticsSummary, DbError> {
        // Independent read-only queries, issued concurrently
        let (totals, verdict_breakdown, top_countries, top_visa_types) = try_join!(
            self.log.totals(),
            self.log.verdict_breakdown(),
            self.log.top_countries(TOP_N_LIMIT, TOP_N_WINDOW_DAYS),
            self.log.top_visa_types(TOP_N_LIMIT, TOP_N_WINDOW_DAYS),
        )?;

        let follow_up_rate = follow_up_rate(totals.total_checks, &verdict_breakdown);

        Ok(AnalyticsSummary {
            total_checks: totals.total_checks,
            checks_last_24h: totals.checks_last_24h,
            average_confidence: totals.average_confidence,
            verdict_breakdown,
            follow_up_rate,
            top_countries: into_volume_counts(top_countries),
            top_visa_types: into_volume_counts(top_visa_types),
        })
    }

    /// Most recent checks for the live feed
    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<RecentCheck>, DbError> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.log.recent(limit).await
    }
}

/// Share of checks flagged for follow-up; 0.0 on an empty log
fn follow_up_rate(total: i64, breakdown: &[VerdictCount]) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let follow_ups: i64 = breakdown
        .iter()
        .filter(|vc| vc.verdict.should_follow_up())
        .map(|vc| vc.count)
        .sum();
    follow_ups as f64 / total as f64
}

fn into_volume_counts(rows: Vec<(String, i64)>) -> Vec<VolumeCount> {
    rows.into_iter()
        .map(|(label, count)| VolumeCount { label, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Verdict;

    #[test]
    fn test_follow_up_rate_on_empty_log_is_zero() {
        assert_eq!(follow_up_rate(0, &[]), 0.0);
    }

    #[test]
    fn test_follow_up_rate_excludes_unlikely() {
        let breakdown = vec![
            VerdictCount {
                verdict: Verdict::Likely,
                count: 6,
            },
            VerdictCount {
                verdict: Verdict::NeedsMoreInfo,
                count: 2,
            },
            VerdictCount {
                verdict: Verdict::Unlikely,
                count: 2,
            },
        ];
        assert_eq!(follow_up_rate(10, &breakdown), 0.8);
    }

    #[test]
    fn test_volume_counts_preserve_order() {
        let counts = into_volume_counts(vec![
            ("United Kingdom".to_string(), 12),
            ("Canada".to_string(), 7),
        ]);
        assert_eq!(counts[0].label, "United Kingdom");
        assert_eq!(counts[1].count, 7);
    }
}
