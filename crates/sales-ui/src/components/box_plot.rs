//! Horizontal box-and-whisker plot widget.
//!
//! One row per group: whiskers as `├──┤`, the Q1–Q3 box filled, the median
//! marked with `┃` and outliers drawn as `○`. The last row of the area holds
//! the value scale.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use sales_data::stats::BoxStats;

use crate::themes::Theme;

/// Rows given to each group when the area has room to spare.
const MAX_ROWS_PER_BOX: usize = 2;

pub struct BoxPlot<'a> {
    pub boxes: &'a [BoxStats],
    /// Decimals used for the scale labels.
    pub decimals: usize,
    pub theme: &'a Theme,
}

impl<'a> BoxPlot<'a> {
    pub fn new(boxes: &'a [BoxStats], theme: &'a Theme) -> Self {
        Self {
            boxes,
            decimals: 2,
            theme,
        }
    }

    /// Value range covered by the plot, outliers included.
    pub fn range(&self) -> (f64, f64) {
        let (min, max) = self
            .boxes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
                (lo.min(b.min_value()), hi.max(b.max_value()))
            });

        if !min.is_finite() || !max.is_finite() {
            (0.0, 1.0)
        } else if min >= max {
            (min, min + 1.0)
        } else {
            (min, max)
        }
    }
}

/// Offset of `value` on a scale of `size` cells spanning `min..=max`.
fn map_value(value: f64, min: f64, max: f64, size: u16) -> u16 {
    if max <= min || size == 0 {
        return 0;
    }
    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (normalized * f64::from(size - 1)).round() as u16
}

impl Widget for BoxPlot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.boxes.is_empty() || area.height < 2 {
            return;
        }

        let label_width = self
            .boxes
            .iter()
            .map(|b| b.label.width())
            .max()
            .unwrap_or(0) as u16;
        let plot_x = area.x + label_width + 1;
        if plot_x + 5 > area.right() {
            return;
        }
        let plot_width = area.right() - plot_x;
        let (min, max) = self.range();
        let x_of = |value: f64| plot_x + map_value(value, min, max, plot_width);

        let rows = usize::from(area.height - 1);
        let box_height = (rows / self.boxes.len()).clamp(1, MAX_ROWS_PER_BOX);

        for (i, stats) in self.boxes.iter().enumerate() {
            let offset = i * box_height;
            if offset >= rows {
                break;
            }
            let y = area.y + offset as u16;
            let style = self.theme.bar.fg(self.theme.series_color(i));

            let pad = label_width.saturating_sub(stats.label.width() as u16);
            buf.set_stringn(
                area.x + pad,
                y,
                &stats.label,
                label_width as usize,
                self.theme.axis,
            );

            let (lo, hi) = (x_of(stats.lower_whisker), x_of(stats.upper_whisker));
            for x in lo..=hi {
                buf[(x, y)].set_char('─').set_style(style);
            }
            buf[(lo, y)].set_char('├').set_style(style);
            buf[(hi, y)].set_char('┤').set_style(style);

            for x in x_of(stats.q1)..=x_of(stats.q3) {
                buf[(x, y)].set_char('█').set_style(style);
            }
            buf[(x_of(stats.median), y)]
                .set_char('┃')
                .set_style(self.theme.box_median);

            for &o in &stats.outliers {
                buf[(x_of(o), y)].set_char('○').set_style(self.theme.outlier);
            }
        }

        // Scale: min on the left, midpoint centred, max flush right.
        let scale_y = area.bottom() - 1;
        let label = |v: f64| format!("{:.*}", self.decimals, v);
        let (low, mid, high) = (label(min), label((min + max) / 2.0), label(max));

        buf.set_stringn(plot_x, scale_y, &low, plot_width as usize, self.theme.axis);
        let mid_x = plot_x + (plot_width / 2).saturating_sub(mid.width() as u16 / 2);
        if mid_x > plot_x + low.width() as u16 {
            buf.set_string(mid_x, scale_y, &mid, self.theme.axis);
        }
        let high_x = area.right().saturating_sub(high.width() as u16);
        if high_x > mid_x + mid.width() as u16 {
            buf.set_string(high_x, scale_y, &high, self.theme.axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn stats(label: &str, values: &[f64]) -> BoxStats {
        BoxStats::from_values(label, values).expect("non-empty")
    }

    #[test]
    fn test_map_value() {
        assert_eq!(map_value(0.0, 0.0, 10.0, 11), 0);
        assert_eq!(map_value(10.0, 0.0, 10.0, 11), 10);
        assert_eq!(map_value(5.0, 0.0, 10.0, 11), 5);
        assert_eq!(map_value(20.0, 0.0, 10.0, 11), 10);
        assert_eq!(map_value(1.0, 1.0, 1.0, 11), 0);
    }

    #[test]
    fn test_range_includes_outliers() {
        let theme = Theme::dark();
        let boxes = vec![stats("PS4", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0])];
        assert_eq!(BoxPlot::new(&boxes, &theme).range(), (1.0, 100.0));
    }

    #[test]
    fn test_range_of_constant_group() {
        let theme = Theme::dark();
        let boxes = vec![stats("PC", &[0.5, 0.5])];
        assert_eq!(BoxPlot::new(&boxes, &theme).range(), (0.5, 1.5));
    }

    #[test]
    fn test_render_draws_box_median_and_outlier() {
        let theme = Theme::dark();
        let boxes = vec![
            stats("PS4", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]),
            stats("XOne", &[1.0, 2.0, 3.0]),
        ];
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        BoxPlot::new(&boxes, &theme).render(area, &mut buf);

        let first = row(&buf, 0);
        assert!(first.starts_with(" PS4 ├"));
        assert!(first.contains('┃'));
        assert!(first.ends_with('○'));

        let second = row(&buf, 2);
        // Whisker cap is covered by the box when Q1 maps to the same cell.
        assert!(second.starts_with("XOne █┃"));
        assert!(!second.contains('○'));

        let scale = row(&buf, 4);
        assert!(scale.trim_start().starts_with("1.00"));
        assert!(scale.ends_with("100.00"));
    }

    #[test]
    fn test_render_empty_is_noop() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        BoxPlot::new(&[], &theme).render(area, &mut buf);
        assert!((0..4).all(|y| row(&buf, y).is_empty()));
    }
}
