//! Duration chart widget.
//!
//! Horizontal bar chart for the projects on the current page:
//! - one row per project, labelled by name
//! - bar length proportional to the duration in days
//! - bar color from the project status
//! - the value printed after each bar ("12 days")

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::theme::{colors, styles};
use crate::view::ChartSeries;

/// Unicode block characters for bar rendering
const BLOCK_FULL: char = '█';
const BLOCK_RIGHT_EDGE: char = '▌';
const BLOCK_THIN: char = '▏';

/// Width of the project name column
const NAME_COLUMN: u16 = 20;

/// Space kept after the bar for the value label
const VALUE_COLUMN: u16 = 10;

/// Bar length in cells for `value` when `max` fills `width` cells
pub fn bar_length(value: i64, max: i64, width: u16) -> u16 {
    if value <= 0 || max <= 0 || width == 0 {
        return 0;
    }
    let cells = (value as f64 / max as f64 * width as f64).round() as u16;
    cells.clamp(1, width)
}

pub struct DurationChart<'a> {
    series: &'a ChartSeries,
    title: &'a str,
}

impl<'a> DurationChart<'a> {
    pub fn new(series: &'a ChartSeries) -> Self {
        Self {
            series,
            title: " Project Durations ",
        }
    }

    /// Truncate or pad a name to the name column
    fn fit_name(name: &str) -> String {
        let width = NAME_COLUMN as usize - 1;
        if name.chars().count() > width {
            let cut: String = name.chars().take(width - 1).collect();
            format!("{}…", cut)
        } else {
            format!("{:width$}", name, width = width)
        }
    }

    fn render_bar(&self, index: usize, area: Rect, buf: &mut Buffer, row: u16, max: i64) {
        let y = area.y + row;
        let label = Self::fit_name(&self.series.labels[index]);
        buf.set_string(area.x, y, &label, styles::text());
        buf.set_string(area.x + NAME_COLUMN - 1, y, "│", styles::border_dim());

        let bar_start = area.x + NAME_COLUMN;
        let bar_width = area.width.saturating_sub(NAME_COLUMN + VALUE_COLUMN);
        let value = self.series.values[index];
        let color = self.series.colors[index];
        let length = bar_length(value, max, bar_width);

        let bar_style = Style::default().fg(color);
        if length == 0 {
            buf.set_string(bar_start, y, BLOCK_THIN.to_string(), bar_style);
        } else {
            for col in 0..length {
                let ch = if col + 1 == length && length > 1 {
                    BLOCK_RIGHT_EDGE
                } else {
                    BLOCK_FULL
                };
                buf[(bar_start + col, y)].set_char(ch).set_style(bar_style);
            }
        }

        let value_label = format!(" {} days", value);
        let value_x = bar_start + length.max(1);
        if value_x < area.x + area.width {
            buf.set_string(value_x, y, &value_label, styles::text_dim());
        }
    }

    /// Axis titles along the bottom row
    fn render_axis(&self, area: Rect, buf: &mut Buffer) {
        let y = area.y + area.height - 1;
        let axis_style = Style::default()
            .fg(colors::FG_DIM)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x, y, "Projects", axis_style);
        let bar_start = area.x + NAME_COLUMN;
        for col in bar_start..area.x + area.width {
            buf[(col, y.saturating_sub(1))].set_char('─').set_style(styles::border_dim());
        }
        buf.set_string(bar_start, y, "Days →", axis_style);
    }
}

impl Widget for DurationChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .title_style(Style::default()
                .fg(colors::PURPLE)
                .add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_DARK));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < NAME_COLUMN + VALUE_COLUMN + 1 || inner.height < 3 {
            return;
        }

        if self.series.is_empty() {
            buf.set_string(inner.x, inner.y, "No projects to chart", styles::text_dim());
            return;
        }

        let max = self.series.values.iter().copied().max().unwrap_or(0);
        // Two bottom rows for the axis; one blank row between bars when space allows
        let rows = inner.height.saturating_sub(2);
        let spacing = if rows as usize >= self.series.len() * 2 { 2 } else { 1 };

        for index in 0..self.series.len() {
            let row = index as u16 * spacing;
            if row >= rows {
                break;
            }
            self.render_bar(index, inner, buf, row, max);
        }

        self.render_axis(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn series() -> ChartSeries {
        ChartSeries {
            labels: vec!["Alpha".into(), "Beta".into()],
            values: vec![10, 5],
            colors: vec![colors::CHART_IN_PROGRESS, colors::CHART_COMPLETED],
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_bar_length_scales() {
        assert_eq!(bar_length(10, 10, 40), 40);
        assert_eq!(bar_length(5, 10, 40), 20);
        assert_eq!(bar_length(1, 1000, 40), 1);
        assert_eq!(bar_length(0, 10, 40), 0);
        assert_eq!(bar_length(-3, 10, 40), 0);
        assert_eq!(bar_length(3, 0, 40), 0);
    }

    #[test]
    fn test_fit_name() {
        assert_eq!(DurationChart::fit_name("Short").len(), NAME_COLUMN as usize - 1);
        let long = DurationChart::fit_name("A very long project name indeed");
        assert!(long.ends_with('…'));
        assert_eq!(long.chars().count(), NAME_COLUMN as usize - 1);
    }

    #[test]
    fn test_render_bars() {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        let data = series();
        DurationChart::new(&data).render(area, &mut buf);

        let first = row_text(&buf, 1);
        assert!(first.contains("Alpha"));
        assert!(first.contains("10 days"));
        let second = row_text(&buf, 3);
        assert!(second.contains("Beta"));
        assert!(second.contains("5 days"));

        // Bars take the status colors
        let bar_x = 1 + NAME_COLUMN;
        assert_eq!(buf[(bar_x, 1)].fg, colors::CHART_IN_PROGRESS);
        assert_eq!(buf[(bar_x, 3)].fg, colors::CHART_COMPLETED);
        assert_ne!(buf[(bar_x, 1)].fg, Color::Reset);
    }

    #[test]
    fn test_render_empty_series() {
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        let data = ChartSeries::default();
        DurationChart::new(&data).render(area, &mut buf);
        assert!(row_text(&buf, 1).contains("No projects to chart"));
    }
}
