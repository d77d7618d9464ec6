use crate::logic::projection::ParameterProjection;
use crate::models::format_reading;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bordered card showing a parameter's first valid reading and where it sits in the period range.
pub struct MetricCard<'a> {
    projection: &'a ParameterProjection,
    focused: bool,
}

impl<'a> MetricCard<'a> {
    pub fn new(projection: &'a ParameterProjection) -> Self {
        Self {
            projection,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for MetricCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let block = Block::default()
            .title(self.projection.label())
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(view) = self.projection.view() else {
            Paragraph::new(Line::from(vec![Span::styled("No valid data", Theme::dim())]))
                .render(inner, buf);
            return;
        };

        let value_line = Line::from(vec![
            Span::styled(format_reading(view.metric), Theme::highlight()),
            Span::styled(
                format!(
                    "  (min {} / max {})",
                    format_reading(view.min()),
                    format_reading(view.max())
                ),
                Theme::dim(),
            ),
        ]);
        Paragraph::new(value_line).render(inner, buf);

        // Position of the metric within the period's min..max
        if inner.height >= 2 {
            let bar_area = Rect {
                x: inner.x,
                y: inner.y + 1,
                width: inner.width,
                height: 1,
            };

            let span = view.max() - view.min();
            let ratio = if span > 0.0 {
                ((view.metric - view.min()) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let filled = (bar_area.width as f64 * ratio) as u16;

            for x in bar_area.x..bar_area.x + bar_area.width {
                let ch = if x < bar_area.x + filled {
                    '█'
                } else {
                    '░'
                };
                buf[(x, bar_area.y)].set_char(ch).set_fg(Theme::SERIES);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::projection::project_series;
    use crate::logic::rules::test_support::series;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_metric_value() {
        let projection = project_series(&series("WS10M", &[Some(2.5), Some(6.1)]));
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        MetricCard::new(&projection).render(area, &mut buf);

        assert!(row(&buf, 0).contains("Wind Speed"));
        assert!(row(&buf, 1).contains("2.5"));
        assert!(row(&buf, 1).contains("max 6.1"));
    }

    #[test]
    fn renders_placeholder_without_data() {
        let projection = project_series(&series("T2M", &[None, None]));
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        MetricCard::new(&projection).render(area, &mut buf);

        assert!(row(&buf, 1).contains("No valid data"));
    }
}
