//! Net-position bar chart widget.
//!
//! One cluster of vertical bars per report date, one bar per trader
//! group, drawn around a white zero line: net-long bars rise above it,
//! net-short bars hang below. Rendering goes straight to the buffer so
//! negative values work, which ratatui's stock bar chart cannot do.

use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Widget;

use cotview_core::domain::TraderGroup;

use crate::theme;

/// Left margin reserved for magnitude labels.
const LABEL_WIDTH: u16 = 8;

/// The nets of every trader group on one report date.
#[derive(Debug, Clone)]
pub struct DateCluster {
    pub date: NaiveDate,
    pub nets: Vec<(TraderGroup, i64)>,
}

pub struct NetChart<'a> {
    clusters: &'a [DateCluster],
    /// Index of the date the cursor sits on; kept inside the window.
    selected: usize,
}

impl<'a> NetChart<'a> {
    pub fn new(clusters: &'a [DateCluster], selected: usize) -> Self {
        Self { clusters, selected }
    }
}

impl Widget for NetChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.clusters.is_empty() {
            if area.height > 0 {
                buf.set_string(area.x, area.y, "No data for this market.", theme::muted());
            }
            return;
        }
        if area.width < LABEL_WIDTH + 6 || area.height < 6 {
            return;
        }

        let selected = self.selected.min(self.clusters.len() - 1);

        // Geometry: legend row on top, date axis on the bottom, plot between.
        let plot_left = area.x + LABEL_WIDTH;
        let plot_width = area.width - LABEL_WIDTH;
        let plot_top = area.y + 1;
        let plot_height = area.height - 2;
        let axis_y = area.y + area.height - 1;

        let zero_y = plot_top + (plot_height - 1) / 2;
        let rows_above = (zero_y - plot_top) as i64;
        let rows_below = (plot_top + plot_height - 1 - zero_y) as i64;

        let bars_per_cluster = self
            .clusters
            .iter()
            .map(|c| c.nets.len())
            .max()
            .unwrap_or(1)
            .max(1);
        let cluster_width = bars_per_cluster + 1;
        let visible = (plot_width as usize / cluster_width).max(1);

        // Window the clusters so the selected date is always on screen,
        // with the latest dates shown when the selection is at the end.
        let start = if self.clusters.len() <= visible {
            0
        } else {
            ((selected + 1).max(visible) - visible).min(self.clusters.len() - visible)
        };
        let end = (start + visible).min(self.clusters.len());

        let max_abs = self
            .clusters
            .iter()
            .flat_map(|c| c.nets.iter().map(|(_, net)| net.unsigned_abs()))
            .max()
            .unwrap_or(1)
            .max(1);

        self.draw_legend(area, buf, selected);
        self.draw_scale(area, buf, plot_top, zero_y, plot_height, max_abs);

        // Zero line first; bars start one row off it and never overdraw it.
        for x in plot_left..area.right() {
            buf.set_string(x, zero_y, "─", theme::zero_line());
        }

        for (slot, idx) in (start..end).enumerate() {
            let cluster = &self.clusters[idx];
            let x0 = plot_left + (slot * cluster_width) as u16;
            for (bar, (group, net)) in cluster.nets.iter().enumerate() {
                let x = x0 + bar as u16;
                if x >= area.right() {
                    break;
                }
                let mut style = theme::group_style(*group);
                if idx == selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let half = if *net >= 0 { rows_above } else { rows_below };
                let rows = scaled_rows(net.unsigned_abs(), max_abs, half);
                for k in 1..=rows {
                    let y = if *net >= 0 { zero_y - k as u16 } else { zero_y + k as u16 };
                    buf.set_string(x, y, "█", style);
                }
            }
        }

        self.draw_axis(buf, plot_left, area.right(), axis_y, start, end, selected);
    }
}

impl NetChart<'_> {
    fn draw_legend(&self, area: Rect, buf: &mut Buffer, selected: usize) {
        let mut x = area.x;
        for (group, _) in &self.clusters[0].nets {
            let entry = format!("■ {}  ", group.label());
            let width = entry.chars().count() as u16;
            if x + width >= area.right() {
                break;
            }
            buf.set_string(x, area.y, &entry, theme::group_style(*group));
            x += width;
        }

        let date = self.clusters[selected].date.to_string();
        let date_x = area.right().saturating_sub(date.len() as u16);
        if date_x > x {
            buf.set_string(date_x, area.y, &date, theme::accent_bold());
        }
    }

    fn draw_scale(
        &self,
        area: Rect,
        buf: &mut Buffer,
        plot_top: u16,
        zero_y: u16,
        plot_height: u16,
        max_abs: u64,
    ) {
        let width = LABEL_WIDTH as usize - 1;
        let top = format!("{:>width$}", format!("+{}", format_magnitude(max_abs)));
        let bottom = format!("{:>width$}", format!("-{}", format_magnitude(max_abs)));
        let zero = format!("{:>width$}", "0");
        buf.set_string(area.x, plot_top, &top, theme::muted());
        buf.set_string(area.x, zero_y, &zero, theme::zero_line());
        buf.set_string(area.x, plot_top + plot_height - 1, &bottom, theme::muted());
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_axis(
        &self,
        buf: &mut Buffer,
        left: u16,
        right: u16,
        axis_y: u16,
        start: usize,
        end: usize,
        selected: usize,
    ) {
        let first = self.clusters[start].date.to_string();
        let last = self.clusters[end - 1].date.to_string();

        buf.set_string(left, axis_y, &first, theme::muted());
        let last_x = right.saturating_sub(last.len() as u16);
        if last_x > left + first.len() as u16 {
            buf.set_string(last_x, axis_y, &last, theme::muted());
        }

        // Mark the cursor between the endpoints when it is strictly inside.
        if selected > start && selected + 1 < end {
            let mid = self.clusters[selected].date.format("%m-%d").to_string();
            let mid_x = left + (right - left) / 2;
            if mid_x > left + first.len() as u16 && mid_x + (mid.len() as u16) < last_x {
                buf.set_string(mid_x, axis_y, &mid, theme::accent());
            }
        }
    }
}

/// Bar height in rows for a net of this magnitude; nonzero nets always
/// get at least one row so thin positions stay visible.
fn scaled_rows(magnitude: u64, max_abs: u64, half: i64) -> i64 {
    if magnitude == 0 || half <= 0 {
        return 0;
    }
    let frac = magnitude as f64 / max_abs as f64;
    ((frac * half as f64).round() as i64).clamp(1, half)
}

fn format_magnitude(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 10_000 {
        format!("{}k", value / 1_000)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(y: i32, m: u32, d: u32, commercial: i64, large: i64, small: i64) -> DateCluster {
        DateCluster {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            nets: vec![
                (TraderGroup::Commercial, commercial),
                (TraderGroup::LargeSpeculator, large),
                (TraderGroup::SmallSpeculator, small),
            ],
        }
    }

    fn render_to_content(chart: NetChart, width: u16, height: u16) -> (String, Buffer) {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        let mut content = String::new();
        for y in 0..height {
            for x in 0..width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        (content, buf)
    }

    #[test]
    fn test_net_chart_renders_without_panic() {
        let clusters = vec![
            cluster(2024, 6, 4, -25500, 21500, 4000),
            cluster(2024, 6, 11, -28000, 24000, 4000),
        ];
        let chart = NetChart::new(&clusters, 1);
        render_to_content(chart, 80, 24);
    }

    #[test]
    fn test_empty_series_shows_a_message() {
        let chart = NetChart::new(&[], 0);
        let (content, _) = render_to_content(chart, 80, 24);
        assert!(content.contains("No data"));
    }

    #[test]
    fn test_zero_line_spans_the_plot() {
        let clusters = vec![cluster(2024, 6, 11, -100, 100, 0)];
        let chart = NetChart::new(&clusters, 0);
        let (content, _) = render_to_content(chart, 40, 12);
        let dashes = content.chars().filter(|c| *c == '─').count();
        assert!(dashes >= (40 - LABEL_WIDTH) as usize);
    }

    #[test]
    fn test_bars_rise_above_and_hang_below_the_zero_line() {
        let clusters = vec![cluster(2024, 6, 11, -1000, 1000, 0)];
        let chart = NetChart::new(&clusters, 0);
        let (_, buf) = render_to_content(chart, 40, 16);

        let area = Rect::new(0, 0, 40, 16);
        let mut zero_row = None;
        for y in 0..area.height {
            if buf.cell((LABEL_WIDTH, y)).unwrap().symbol() == "─" {
                zero_row = Some(y);
                break;
            }
        }
        let zero_row = zero_row.expect("zero line missing");

        let mut above = false;
        let mut below = false;
        for y in 0..area.height {
            for x in 0..area.width {
                if buf.cell((x, y)).unwrap().symbol() == "█" {
                    if y < zero_row {
                        above = true;
                    }
                    if y > zero_row {
                        below = true;
                    }
                }
            }
        }
        assert!(above, "net-long bar should rise above the zero line");
        assert!(below, "net-short bar should hang below the zero line");
    }

    #[test]
    fn test_selected_date_appears_in_the_legend() {
        let clusters = vec![
            cluster(2024, 6, 4, -100, 100, 0),
            cluster(2024, 6, 11, -200, 200, 0),
        ];
        let chart = NetChart::new(&clusters, 1);
        let (content, _) = render_to_content(chart, 80, 24);
        assert!(content.contains("2024-06-11"));
    }

    #[test]
    fn test_window_follows_the_selected_cluster() {
        let clusters: Vec<DateCluster> = (0..200)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64 * 7);
                DateCluster {
                    date,
                    nets: vec![(TraderGroup::Commercial, i as i64 - 100)],
                }
            })
            .collect();

        let newest = clusters.last().unwrap().date.to_string();
        let oldest = clusters[0].date.to_string();

        let (content, _) = render_to_content(NetChart::new(&clusters, 199), 60, 20);
        assert!(content.contains(&newest));
        assert!(!content.contains(&oldest));

        let (content, _) = render_to_content(NetChart::new(&clusters, 0), 60, 20);
        assert!(content.contains(&oldest));
    }

    #[test]
    fn test_nonzero_nets_always_draw_at_least_one_row() {
        assert_eq!(scaled_rows(1, 1_000_000, 8), 1);
        assert_eq!(scaled_rows(0, 1_000_000, 8), 0);
        assert_eq!(scaled_rows(1_000_000, 1_000_000, 8), 8);
    }

    #[test]
    fn test_magnitudes_abbreviate() {
        assert_eq!(format_magnitude(500), "500");
        assert_eq!(format_magnitude(45_000), "45k");
        assert_eq!(format_magnitude(1_250_000), "1.2M");
    }
}
