//! View model built from the project collection.
//!
//! `ViewState` is rebuilt explicitly after every mutation, the same points
//! where a full re-render happens. Drawing (`ui.rs`) only reads it. Changing
//! page rebuilds the chart and pagination controls but not the cards, which
//! always list the whole collection.

use ratatui::style::Color;
use uuid::Uuid;

use crate::derive::{duration_days, status_badge, status_color, summary_stats, BadgeKind, SummaryStats};
use crate::models::{Project, DATE_FORMAT};
use crate::pagination::PageState;

/// One project card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub badge: BadgeKind,
    pub date_range: String,
    pub duration_days: i64,
    pub tasks: Vec<String>,
}

impl CardView {
    fn from_project(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            status: project.status.label().to_string(),
            badge: status_badge(&project.status),
            date_range: format!(
                "{} to {}",
                project.start.format(DATE_FORMAT),
                project.end.format(DATE_FORMAT)
            ),
            duration_days: duration_days(project),
            tasks: project
                .tasks
                .iter()
                .map(|t| format!("{} - {}", t.task, t.date.format(DATE_FORMAT)))
                .collect(),
        }
    }
}

/// Card region contents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardsView {
    /// Empty-state placeholder
    #[default]
    Empty,
    Cards(Vec<CardView>),
}

impl CardsView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            CardsView::Empty => &[],
            CardsView::Cards(cards) => cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CardsView::Empty)
    }
}

/// Horizontal bar series: one bar per project on the current page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub colors: Vec<Color>,
}

impl ChartSeries {
    pub fn from_projects(projects: &[Project]) -> Self {
        Self {
            labels: projects.iter().map(|p| p.name.clone()).collect(),
            values: projects.iter().map(duration_days).collect(),
            colors: projects.iter().map(|p| status_color(&p.status)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Holder for the single live chart.
///
/// A new series is only installed after the previous one has been dropped,
/// so at most one chart exists at any time.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartSeries>,
    builds: u64,
}

impl ChartSlot {
    pub fn replace(&mut self, series: ChartSeries) {
        self.current = None;
        self.builds += 1;
        tracing::trace!(build = self.builds, bars = series.len(), "chart rebuilt");
        self.current = Some(series);
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        self.current.as_ref()
    }

    /// Number of charts built so far
    #[cfg(test)]
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub number: usize,
    pub active: bool,
}

/// Previous / page numbers / next
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationControls {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub pages: Vec<PageButton>,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub pages: PageState,
    /// Card whose actions popover is open
    pub open_actions: Option<Uuid>,
    pub cards: CardsView,
    pub stats: SummaryStats,
    pub chart: ChartSlot,
    pub pagination: PaginationControls,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: PageState::new(page_size),
            ..Self::default()
        }
    }

    /// Full re-render: cards, stats, chart and pagination
    pub fn render_all(&mut self, projects: &[Project]) {
        self.render_cards(projects);
        self.render_stats(projects);
        self.render_chart(projects);
    }

    pub fn render_cards(&mut self, projects: &[Project]) {
        self.cards = if projects.is_empty() {
            CardsView::Empty
        } else {
            CardsView::Cards(projects.iter().map(CardView::from_project).collect())
        };
        if let Some(id) = self.open_actions {
            if !projects.iter().any(|p| p.id == id) {
                self.open_actions = None;
            }
        }
    }

    pub fn render_stats(&mut self, projects: &[Project]) {
        self.stats = summary_stats(projects);
    }

    /// Rebuild the chart for the current page, then the pagination controls
    pub fn render_chart(&mut self, projects: &[Project]) {
        let series = ChartSeries::from_projects(self.pages.page_slice(projects));
        self.chart.replace(series);
        self.render_pagination_controls(projects.len());
    }

    pub fn render_pagination_controls(&mut self, count: usize) {
        let total = self.pages.total_pages(count);
        if total <= 1 {
            self.pagination = PaginationControls::default();
            return;
        }
        let current = self.pages.current_page();
        self.pagination = PaginationControls {
            visible: true,
            prev_enabled: current > 1,
            next_enabled: current < total,
            pages: (1..=total)
                .map(|number| PageButton {
                    number,
                    active: number == current,
                })
                .collect(),
        };
    }

    /// Switch chart page. Invalid pages are ignored.
    pub fn change_page(&mut self, requested: usize, projects: &[Project]) -> bool {
        if !self.pages.change_page(requested, projects.len()) {
            return false;
        }
        self.render_chart(projects);
        true
    }

    /// Open the popover for `id`, closing any other; close it if already open
    pub fn toggle_actions(&mut self, id: Uuid) {
        self.open_actions = match self.open_actions {
            Some(open) if open == id => None,
            _ => Some(id),
        };
    }

    pub fn close_all_actions(&mut self) {
        self.open_actions = None;
    }

    pub fn actions_open_for(&self, id: Uuid) -> bool {
        self.open_actions == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectStatus, Task};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn projects(n: usize) -> Vec<Project> {
        (0..n)
            .map(|i| Project {
                id: Uuid::new_v4(),
                name: format!("Project {}", i + 1),
                status: if i % 2 == 0 {
                    ProjectStatus::InProgress
                } else {
                    ProjectStatus::Completed
                },
                start: date(1),
                end: date(2 + i as u32),
                tasks: vec![Task {
                    task: "Plan".to_string(),
                    date: date(1),
                }],
            })
            .collect()
    }

    #[test]
    fn test_empty_collection_renders_placeholder() {
        let mut view = ViewState::new(3);
        view.render_all(&[]);
        assert!(view.cards.is_empty());
        assert_eq!(view.stats, SummaryStats::default());
        assert!(view.chart.series().unwrap().is_empty());
        assert!(!view.pagination.visible);
    }

    #[test]
    fn test_cards_show_full_collection_and_chart_shows_page() {
        let items = projects(4);
        let mut view = ViewState::new(3);
        view.render_all(&items);

        assert_eq!(view.cards.cards().len(), 4);
        let series = view.chart.series().unwrap();
        assert_eq!(series.labels, vec!["Project 1", "Project 2", "Project 3"]);
        assert_eq!(series.values, vec![1, 2, 3]);

        assert!(view.change_page(2, &items));
        assert_eq!(view.cards.cards().len(), 4);
        assert_eq!(view.chart.series().unwrap().labels, vec!["Project 4"]);
    }

    #[test]
    fn test_card_contents() {
        let items = projects(1);
        let mut view = ViewState::new(3);
        view.render_cards(&items);
        let card = &view.cards.cards()[0];
        assert_eq!(card.status, "In Progress");
        assert_eq!(card.badge, BadgeKind::Warning);
        assert_eq!(card.date_range, "2024-01-01 to 2024-01-02");
        assert_eq!(card.duration_days, 1);
        assert_eq!(card.tasks, vec!["Plan - 2024-01-01"]);
    }

    #[test]
    fn test_pagination_controls() {
        let items = projects(7);
        let mut view = ViewState::new(3);
        view.render_all(&items);
        assert!(view.pagination.visible);
        assert!(!view.pagination.prev_enabled);
        assert!(view.pagination.next_enabled);
        assert_eq!(view.pagination.pages.len(), 3);
        assert!(view.pagination.pages[0].active);

        view.change_page(3, &items);
        assert!(view.pagination.prev_enabled);
        assert!(!view.pagination.next_enabled);
        assert!(view.pagination.pages[2].active);
    }

    #[test]
    fn test_pagination_hidden_for_single_page() {
        let items = projects(3);
        let mut view = ViewState::new(3);
        view.render_all(&items);
        assert!(!view.pagination.visible);
    }

    #[test]
    fn test_invalid_page_change_keeps_chart() {
        let items = projects(4);
        let mut view = ViewState::new(3);
        view.render_all(&items);
        let builds = view.chart.builds();
        assert!(!view.change_page(5, &items));
        assert!(!view.change_page(0, &items));
        assert_eq!(view.chart.builds(), builds);
        assert_eq!(view.pages.current_page(), 1);
    }

    #[test]
    fn test_chart_replaced_not_accumulated() {
        let items = projects(4);
        let mut view = ViewState::new(3);
        view.render_all(&items);
        view.render_chart(&items);
        view.change_page(2, &items);
        assert_eq!(view.chart.builds(), 3);
        assert_eq!(view.chart.series().unwrap().len(), 1);
    }

    #[test]
    fn test_single_actions_popover() {
        let items = projects(2);
        let mut view = ViewState::new(3);
        view.render_all(&items);

        view.toggle_actions(items[0].id);
        assert!(view.actions_open_for(items[0].id));
        view.toggle_actions(items[1].id);
        assert!(!view.actions_open_for(items[0].id));
        assert!(view.actions_open_for(items[1].id));
        view.toggle_actions(items[1].id);
        assert_eq!(view.open_actions, None);

        view.toggle_actions(items[0].id);
        view.close_all_actions();
        assert_eq!(view.open_actions, None);
    }
}
