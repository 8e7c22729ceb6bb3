//! Pure computations over the project collection.

use ratatui::style::Color;

use crate::models::{Project, ProjectStatus};
use crate::theme::colors;

/// Whole days between a project's start and end dates
pub fn duration_days(project: &Project) -> i64 {
    (project.end - project.start).num_days()
}

/// Aggregate counters shown in the stats strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryStats {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub average_duration_days: i64,
}

pub fn summary_stats(projects: &[Project]) -> SummaryStats {
    let total = projects.len();
    let in_progress = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::InProgress)
        .count();
    let completed = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .count();
    let sum: i64 = projects.iter().map(duration_days).sum();

    SummaryStats {
        total,
        in_progress,
        completed,
        average_duration_days: rounded_average(sum, total),
    }
}

/// `round(sum / count)` with halves rounded toward positive infinity,
/// 0 for an empty collection.
fn rounded_average(sum: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    let count = count as i64;
    (2 * sum + count).div_euclid(2 * count)
}

/// Chart bar color for a status. Unrecognized labels get the fallback color.
pub fn status_color(status: &ProjectStatus) -> Color {
    match status {
        ProjectStatus::Completed => colors::CHART_COMPLETED,
        ProjectStatus::InProgress => colors::CHART_IN_PROGRESS,
        ProjectStatus::OnHold => colors::CHART_ON_HOLD,
        ProjectStatus::Cancelled => colors::CHART_CANCELLED,
        ProjectStatus::Unknown(_) => colors::CHART_FALLBACK,
    }
}

/// Card badge variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Success,
    Warning,
    Info,
    Danger,
    Secondary,
}

pub fn status_badge(status: &ProjectStatus) -> BadgeKind {
    match status {
        ProjectStatus::Completed => BadgeKind::Success,
        ProjectStatus::InProgress => BadgeKind::Warning,
        ProjectStatus::OnHold => BadgeKind::Info,
        ProjectStatus::Cancelled => BadgeKind::Danger,
        ProjectStatus::Unknown(_) => BadgeKind::Secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn project(status: ProjectStatus, start: (i32, u32, u32), end: (i32, u32, u32)) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "p".to_string(),
            status,
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            tasks: Vec::new(),
        }
    }

    #[test]
    fn test_duration_same_day_is_zero() {
        let p = project(ProjectStatus::Completed, (2024, 3, 5), (2024, 3, 5));
        assert_eq!(duration_days(&p), 0);
    }

    #[test]
    fn test_duration_counts_calendar_days() {
        let p = project(ProjectStatus::Completed, (2024, 1, 1), (2024, 1, 10));
        assert_eq!(duration_days(&p), 9);
        // Spans a DST change in most zones; calendar math is unaffected
        let p = project(ProjectStatus::Completed, (2024, 3, 1), (2024, 4, 1));
        assert_eq!(duration_days(&p), 31);
    }

    #[test]
    fn test_summary_of_empty_collection() {
        assert_eq!(summary_stats(&[]), SummaryStats::default());
    }

    #[test]
    fn test_summary_counts_and_average() {
        let projects = vec![
            project(ProjectStatus::InProgress, (2024, 1, 1), (2024, 1, 10)), // 9
            project(ProjectStatus::Completed, (2024, 1, 1), (2024, 1, 2)),   // 1
            project(ProjectStatus::Unknown("Draft".into()), (2024, 1, 1), (2024, 1, 1)), // 0
        ];
        let stats = summary_stats(&projects);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        // 10 / 3 = 3.33
        assert_eq!(stats.average_duration_days, 3);
    }

    #[test]
    fn test_average_rounds_half_up() {
        assert_eq!(rounded_average(5, 2), 3);
        assert_eq!(rounded_average(7, 2), 4);
        assert_eq!(rounded_average(-5, 2), -2);
        assert_eq!(rounded_average(0, 0), 0);
    }

    #[test]
    fn test_status_color_is_total() {
        assert_eq!(status_color(&ProjectStatus::Completed), colors::CHART_COMPLETED);
        assert_eq!(
            status_color(&ProjectStatus::Unknown("whatever".into())),
            colors::CHART_FALLBACK
        );
        assert_eq!(status_badge(&ProjectStatus::Cancelled), BadgeKind::Danger);
        assert_eq!(status_badge(&ProjectStatus::Unknown(String::new())), BadgeKind::Secondary);
    }
}
