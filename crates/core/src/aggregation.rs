//! Inspection aggregator: chart-ready summaries over a list of records.
//!
//! Every function recomputes from scratch over the slice it is given. There
//! is no cached or incremental state. Empty input always yields empty
//! distributions and zero totals.

use chrono::Datelike;
use serde::Serialize;

use crate::inspection::{ChecklistStatus, InspectionRecord, InspectionStatus};
use crate::types::{DbId, InspectionDate};

/// Portuguese month abbreviations, January first.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Default number of inspections listed on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// One bar or slice of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
}

/// Headline numbers of the reports page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub total_inspections: usize,
    pub total_items: usize,
    pub non_conformities: usize,
    pub approved_items: usize,
}

/// Everything the reports page and the summary PDF need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionSummary {
    pub by_status: Vec<DistributionEntry>,
    pub non_conformities_by_area: Vec<DistributionEntry>,
    pub by_month: Vec<DistributionEntry>,
    pub totals: ReportTotals,
}

/// Dashboard row for a recent inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentInspection {
    pub id: DbId,
    pub project_name: String,
    pub address: String,
    pub date: InspectionDate,
    pub status: InspectionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub recent: Vec<RecentInspection>,
}

/// Count labels, keeping the order in which each label first appeared.
fn count_first_seen<I>(labels: I) -> Vec<DistributionEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut entries: Vec<DistributionEntry> = Vec::new();
    for label in labels {
        match entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.count += 1,
            None => entries.push(DistributionEntry { label, count: 1 }),
        }
    }
    entries
}

/// Records per status, in first-seen order.
pub fn status_distribution(records: &[InspectionRecord]) -> Vec<DistributionEntry> {
    count_first_seen(records.iter().map(|r| r.status.label().to_string()))
}

/// Rejected checklist items per area, in first-seen order.
///
/// Each item is tagged with the area list it was filed under while
/// flattening, so the grouping never depends on how items are named.
pub fn non_conformity_distribution(records: &[InspectionRecord]) -> Vec<DistributionEntry> {
    count_first_seen(
        records
            .iter()
            .flat_map(InspectionRecord::tagged_items)
            .filter(|(_, item)| item.status == ChecklistStatus::Rejected)
            .map(|(area, _)| area.label().to_string()),
    )
}

/// Chronological sort key of a month bucket.
fn month_key(date: InspectionDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// `Jul/24` style label.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_ABBREVIATIONS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{name}/{:02}", year.rem_euclid(100))
}

/// Records per calendar month, oldest month first.
///
/// Sorting uses the numeric (year, month) key, so `Jan/25` follows `Dez/24`.
pub fn monthly_distribution(records: &[InspectionRecord]) -> Vec<DistributionEntry> {
    let mut buckets: Vec<((i32, u32), usize)> = Vec::new();
    for record in records {
        let key = month_key(record.date);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => buckets.push((key, 1)),
        }
    }
    buckets.sort_by_key(|(key, _)| *key);
    buckets
        .into_iter()
        .map(|((year, month), count)| DistributionEntry {
            label: month_label(year, month),
            count,
        })
        .collect()
}

pub fn report_totals(records: &[InspectionRecord]) -> ReportTotals {
    let mut totals = ReportTotals {
        total_inspections: records.len(),
        ..ReportTotals::default()
    };
    for (_, item) in records.iter().flat_map(InspectionRecord::tagged_items) {
        totals.total_items += 1;
        match item.status {
            ChecklistStatus::Approved => totals.approved_items += 1,
            ChecklistStatus::Rejected => totals.non_conformities += 1,
            ChecklistStatus::Pending => {}
        }
    }
    totals
}

pub fn summarize(records: &[InspectionRecord]) -> InspectionSummary {
    InspectionSummary {
        by_status: status_distribution(records),
        non_conformities_by_area: non_conformity_distribution(records),
        by_month: monthly_distribution(records),
        totals: report_totals(records),
    }
}

/// Status counters plus the `limit` most recent inspections (date desc, id desc).
pub fn dashboard_stats(records: &[InspectionRecord], limit: usize) -> DashboardStats {
    let count = |status: InspectionStatus| records.iter().filter(|r| r.status == status).count();

    let mut recent: Vec<&InspectionRecord> = records.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    DashboardStats {
        pending: count(InspectionStatus::Pending),
        in_progress: count(InspectionStatus::InProgress),
        completed: count(InspectionStatus::Completed),
        recent: recent
            .into_iter()
            .take(limit)
            .map(|r| RecentInspection {
                id: r.id,
                project_name: r.project_name.clone(),
                address: r.address.clone(),
                date: r.date,
                status: r.status,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::inspection::ChecklistArea;
    use crate::sample::sample_inspections;

    fn dated(id: DbId, y: i32, m: u32, d: u32, status: InspectionStatus) -> InspectionRecord {
        let mut record = sample_inspections().remove(0);
        record.id = id;
        record.date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        record.status = status;
        record
    }

    fn total(entries: &[DistributionEntry]) -> usize {
        entries.iter().map(|e| e.count).sum()
    }

    #[test]
    fn empty_input_yields_empty_distributions() {
        let summary = summarize(&[]);
        assert!(summary.by_status.is_empty());
        assert!(summary.non_conformities_by_area.is_empty());
        assert!(summary.by_month.is_empty());
        assert_eq!(summary.totals, ReportTotals::default());
    }

    #[test]
    fn status_counts_sum_to_record_count() {
        let records = vec![
            dated(1, 2024, 1, 1, InspectionStatus::Completed),
            dated(2, 2024, 1, 2, InspectionStatus::Pending),
            dated(3, 2024, 1, 3, InspectionStatus::Completed),
            dated(4, 2024, 1, 4, InspectionStatus::InProgress),
        ];
        let dist = status_distribution(&records);

        assert_eq!(total(&dist), records.len());
        let labels: Vec<_> = dist.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Concluída", "Pendente", "Em Andamento"]);
        assert_eq!(dist[0].count, 2);
    }

    #[test]
    fn non_conformities_count_every_rejected_item() {
        let mut records = sample_inspections();
        records[0].electrical[0].status = ChecklistStatus::Rejected;
        records[0].structural[0].status = ChecklistStatus::Rejected;

        let rejected = records
            .iter()
            .flat_map(|r| r.tagged_items())
            .filter(|(_, i)| i.status == ChecklistStatus::Rejected)
            .count();
        let dist = non_conformity_distribution(&records);

        assert_eq!(total(&dist), rejected);
        assert_eq!(
            dist,
            vec![
                DistributionEntry {
                    label: ChecklistArea::Structural.label().into(),
                    count: 1
                },
                DistributionEntry {
                    label: ChecklistArea::Electrical.label().into(),
                    count: 1
                },
                DistributionEntry {
                    label: ChecklistArea::Plumbing.label().into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn area_comes_from_list_not_from_item_name() {
        let mut records = sample_inspections();
        // An electrical item whose name looks structural.
        records[0].electrical[0].name = "Estrutural - fiação".into();
        records[0].electrical[0].status = ChecklistStatus::Rejected;
        records.truncate(1);

        let dist = non_conformity_distribution(&records);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].label, "Elétrica");
    }

    #[test]
    fn months_sort_chronologically_across_year_boundary() {
        let records = vec![
            dated(1, 2025, 1, 10, InspectionStatus::Pending),
            dated(2, 2024, 12, 5, InspectionStatus::Pending),
            dated(3, 2025, 1, 20, InspectionStatus::Pending),
            dated(4, 2024, 2, 1, InspectionStatus::Pending),
        ];
        let dist = monthly_distribution(&records);
        let labels: Vec<_> = dist.iter().map(|e| e.label.as_str()).collect();

        assert_eq!(labels, vec!["Fev/24", "Dez/24", "Jan/25"]);
        assert_eq!(dist[2].count, 2);
    }

    #[test]
    fn month_label_pads_two_digit_year() {
        assert_eq!(month_label(2007, 3), "Mar/07");
        assert_eq!(month_label(2024, 7), "Jul/24");
    }

    #[test]
    fn totals_match_sample_data() {
        let totals = report_totals(&sample_inspections());
        assert_eq!(
            totals,
            ReportTotals {
                total_inspections: 2,
                total_items: 6,
                non_conformities: 1,
                approved_items: 2,
            }
        );
    }

    #[test]
    fn dashboard_lists_most_recent_first() {
        let records = vec![
            dated(1, 2024, 3, 1, InspectionStatus::Pending),
            dated(2, 2024, 5, 1, InspectionStatus::Completed),
            dated(3, 2024, 4, 1, InspectionStatus::Pending),
        ];
        let stats = dashboard_stats(&records, 2);

        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 0);
        let ids: Vec<_> = stats.recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
