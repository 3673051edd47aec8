use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

const BAR_CHAR: char = '\u{2588}'; // █  FULL BLOCK

/// Horizontal bar chart: one row per bar, label on the left, value on the
/// right of the bar.
///
/// Bars are scaled against the largest value. A zero value leaves the row
/// empty apart from its label and value, so gaps in a series stay visible.
pub struct HorizontalBarChart<'a> {
    pub labels: &'a [String],
    pub values: &'a [f64],
    /// Decimals used for the value text.
    pub decimals: usize,
    pub theme: &'a Theme,
}

impl<'a> HorizontalBarChart<'a> {
    pub fn new(labels: &'a [String], values: &'a [f64], theme: &'a Theme) -> Self {
        Self {
            labels,
            values,
            decimals: 0,
            theme,
        }
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    fn value_text(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}

/// Number of filled cells for `value` on a bar of `width` cells.
pub(crate) fn bar_length(value: f64, max: f64, width: u16) -> u16 {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return 0;
    }
    let cells = (value / max * f64::from(width)).round();
    // Non-zero values always get at least one cell.
    (cells as u16).clamp(1, width)
}

impl Widget for HorizontalBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 || self.labels.is_empty() {
            return;
        }

        let label_width = self
            .labels
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0) as u16;
        let value_width = self
            .values
            .iter()
            .map(|v| self.value_text(*v).width())
            .max()
            .unwrap_or(0) as u16;
        let bar_width = area
            .width
            .saturating_sub(label_width + 1)
            .saturating_sub(value_width + 1);
        let max = self.values.iter().copied().fold(0.0_f64, f64::max);

        for (i, (label, value)) in self.labels.iter().zip(self.values).enumerate() {
            let y = area.y + i as u16;
            if y >= area.bottom() {
                break;
            }

            let pad = label_width.saturating_sub(label.width() as u16);
            buf.set_stringn(
                area.x + pad,
                y,
                label,
                label_width as usize,
                self.theme.axis,
            );

            let bar_x = area.x + label_width + 1;
            let filled = bar_length(*value, max, bar_width);
            for x in bar_x..bar_x + filled {
                buf[(x, y)].set_char(BAR_CHAR).set_style(self.theme.bar);
            }

            let text = self.value_text(*value);
            let text_x = bar_x + filled + 1;
            if text_x < area.right() {
                buf.set_stringn(
                    text_x,
                    y,
                    &text,
                    (area.right() - text_x) as usize,
                    self.theme.text,
                );
            }
        }
    }
}
