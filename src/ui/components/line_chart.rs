use crate::logic::projection::ParameterView;
use crate::models::format_reading;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

/// Valid readings plotted against their position in the period.
pub struct SeriesChart<'a> {
    view: Option<&'a ParameterView>,
    title: &'a str,
}

impl<'a> SeriesChart<'a> {
    pub fn new(title: &'a str, view: Option<&'a ParameterView>) -> Self {
        Self { view, title }
    }
}

/// Pads a flat series so the y-axis never collapses to a single value.
fn y_bounds(view: &ParameterView) -> [f64; 2] {
    let (min, max) = (view.min(), view.max());
    if (max - min).abs() < f64::EPSILON {
        [min - 1.0, max + 1.0]
    } else {
        [min, max]
    }
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let Some(view) = self.view else {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled("No valid data to plot", Theme::dim()))
                .render(inner, buf);
            return;
        };

        let points = view.points();
        let x_max = (points.len().saturating_sub(1)).max(1) as f64;
        let [y_min, y_max] = y_bounds(view);

        let dataset = Dataset::default()
            .name(view.code.as_str())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::series())
            .data(&points);

        let x_axis = Axis::default()
            .title("Day")
            .style(Theme::axis())
            .bounds([0.0, x_max])
            .labels(vec!["1".to_string(), format!("{}", points.len())]);

        let y_axis = Axis::default()
            .style(Theme::axis())
            .bounds([y_min, y_max])
            .labels(vec![format_reading(y_min), format_reading(y_max)]);

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(series: Vec<f64>) -> ParameterView {
        ParameterView {
            code: "T2M".into(),
            label: "Temperature at 2m (°C)".into(),
            metric: series[0],
            series,
        }
    }

    #[test]
    fn flat_series_gets_padded_bounds() {
        assert_eq!(y_bounds(&view(vec![4.0, 4.0])), [3.0, 5.0]);
        assert_eq!(y_bounds(&view(vec![1.5, 4.0, 2.0])), [1.5, 4.0]);
    }

    #[test]
    fn renders_without_panicking_for_single_point() {
        let v = view(vec![21.0]);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        SeriesChart::new("T2M", Some(&v)).render(area, &mut buf);
    }
}
