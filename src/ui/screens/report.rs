use crate::logic::pipeline::AnalysisReport;
use crate::ui::components::{MetricCard, SeriesChart};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct ReportScreen<'a> {
    pub report: &'a AnalysisReport,
    pub selected_index: usize,
    pub status: Option<&'a str>,
}

impl<'a> ReportScreen<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            selected_index: 0,
            status: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for ReportScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let advisory_height = self.report.advisories.len().max(1) as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),               // Title + selection
                Constraint::Min(10),                 // Parameters
                Constraint::Length(advisory_height), // Advisories
                Constraint::Length(1),               // Nav
            ])
            .split(area);

        render_header(self.report, self.status, chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        self.render_list(content[0], buf);
        self.render_details(content[1], buf);
        self.render_advisories(chunks[2], buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Parameter ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Insights ", Theme::nav_label()),
            Span::styled("[q/Esc]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

fn render_header(report: &AnalysisReport, status: Option<&str>, area: Rect, buf: &mut Buffer) {
    let selection = &report.selection;
    let range = selection.range();
    let mut title = vec![
        Span::styled("AgroInsight", Theme::title()),
        Span::styled(
            format!(
                "  {} | {} | {} to {}",
                selection.crop_names().join(", "),
                selection.size(),
                range.start,
                range.end
            ),
            Theme::dim(),
        ),
    ];
    if let Some(status) = status {
        title.push(Span::styled(format!("  {}", status), Theme::warning()));
    }

    let lines = vec![
        Line::from(title),
        Line::from(vec![Span::styled(
            selection.coordinate().to_string(),
            Theme::dim(),
        )]),
    ];
    Paragraph::new(lines).render(area, buf);
}

impl ReportScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Parameters")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.report.projections.is_empty() {
            Paragraph::new(Span::styled("No parameters returned", Theme::dim())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .report
            .projections
            .iter()
            .enumerate()
            .map(|(i, projection)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };

                let marker = if projection.view().is_some() {
                    Span::styled("● ", Theme::success())
                } else {
                    Span::styled("○ ", Theme::dim())
                };

                ListItem::new(Line::from(vec![marker, Span::raw(projection.code())])).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let Some(projection) = self.report.projections.get(self.selected_index) else {
            let block = Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Theme::border());
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled(
                "Select a parameter to view details",
                Theme::dim(),
            ))
            .render(inner, buf);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(area);

        MetricCard::new(projection)
            .focused(true)
            .render(chunks[0], buf);
        SeriesChart::new(projection.label(), projection.view()).render(chunks[1], buf);
    }

    fn render_advisories(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Advisories")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.report.advisories.is_empty() {
            Paragraph::new(Span::styled(
                "No advisories: the first day has no usable readings",
                Theme::dim(),
            ))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .report
            .advisories
            .iter()
            .map(|advisory| {
                Line::from(vec![
                    Span::styled(
                        format!("{} ", advisory.symbol()),
                        Style::default().fg(advisory.category.color()),
                    ),
                    Span::styled(
                        format!("{:<12}", advisory.category.as_str()),
                        Style::default().fg(advisory.category.color()),
                    ),
                    Span::styled(
                        advisory.message.as_str(),
                        Theme::advisory(advisory.action_needed),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

pub struct InsightsScreen<'a> {
    pub report: &'a AnalysisReport,
    pub scroll: u16,
}

impl<'a> InsightsScreen<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report, scroll: 0 }
    }

    pub fn with_scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(6),    // Text
                Constraint::Length(1), // Nav
            ])
            .split(area)
    }

    /// Plain lines of the text panel, before wrapping.
    fn text_lines(&self) -> Vec<&'a str> {
        let report: &'a AnalysisReport = self.report;
        let insights = &report.insights;
        let mut lines: Vec<&'a str> = insights.text.lines().collect();
        if let Some(ref diagnostic) = insights.diagnostic {
            lines.extend(["", "Details:", diagnostic.as_str()]);
        }
        lines
    }

    /// Largest scroll offset that still leaves text in the panel for `area`.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let body = Self::layout(area)[1];
        let width = usize::from(body.width.saturating_sub(2)).max(1);
        let height = body.height.saturating_sub(2);
        let rows: usize = self
            .text_lines()
            .iter()
            .map(|line| wrapped_rows(line, width))
            .sum();
        u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_sub(height)
    }
}

/// Rows a line takes when word-wrapped to `width` columns.
fn wrapped_rows(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= width {
            used = needed;
        } else if len <= width {
            rows += 1;
            used = len;
        } else {
            // Long words are broken across rows
            if used > 0 {
                rows += 1;
            }
            rows += (len - 1) / width;
            used = len % width;
            if used == 0 {
                used = width;
            }
        }
    }
    rows
}

impl Widget for InsightsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Self::layout(area);
        let scroll = self.scroll.min(self.max_scroll(area));

        render_header(self.report, None, chunks[0], buf);

        let insights = &self.report.insights;
        let block = Block::default()
            .title("Insights")
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(chunks[1]);
        block.render(chunks[1], buf);

        let text_style = if insights.is_fallback() {
            Theme::warning()
        } else {
            Theme::normal()
        };
        let mut lines: Vec<Line> = insights
            .text
            .lines()
            .map(|l| Line::from(Span::styled(l, text_style)))
            .collect();

        if let Some(ref diagnostic) = insights.diagnostic {
            lines.push(Line::from(vec![]));
            lines.push(Line::from(vec![Span::styled("Details:", Theme::dim())]));
            lines.push(Line::from(vec![Span::styled(
                diagnostic.as_str(),
                Theme::error(),
            )]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(inner, buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Scroll ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Parameters ", Theme::nav_label()),
            Span::styled("[q/Esc]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::projection::project;
    use crate::logic::rules::test_support::{payload, series};
    use crate::logic::rules::SuggestionEngine;
    use crate::models::{
        Coordinate, Crop, DatePolicy, InsightResult, SelectionForm, SizeCategory, INSIGHT_FALLBACK,
    };
    use chrono::NaiveDate;

    fn report(insights: InsightResult) -> AnalysisReport {
        let payload = payload(vec![
            series("PRECTOTCORR", &[Some(3.0), Some(1.0)]),
            series("ALLSKY_SFC_UV_INDEX", &[Some(9.0), Some(7.0)]),
            series("WS10M", &[Some(2.0), Some(5.5)]),
        ]);
        let selection = SelectionForm {
            crops: [Crop::Corn].into_iter().collect(),
            size: Some(SizeCategory::OneToThreeHectares),
            coordinate: Some(Coordinate::new(-16.71, -49.26)),
            start: NaiveDate::from_ymd_opt(2024, 10, 1),
            end: NaiveDate::from_ymd_opt(2024, 10, 2),
        }
        .submit(&DatePolicy::default())
        .unwrap();

        AnalysisReport {
            selection,
            advisories: SuggestionEngine::new().derive_advisories(&payload),
            projections: project(&payload),
            payload,
            insights,
        }
    }

    fn contents(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn report_screen_shows_advisories_and_parameters() {
        let report = report(InsightResult::generated("Irrigate today."));
        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        ReportScreen::new(&report).render(area, &mut buf);

        let text = contents(&buf);
        assert!(text.contains("PRECTOTCORR"));
        assert!(text.contains("Low precipitation (3.0 mm). Irrigation suggested."));
        assert!(text.contains("High UV index (9.0). Protect the plants."));
    }

    #[test]
    fn word_wrap_row_count() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("irrigate at dawn", 16), 1);
        assert_eq!(wrapped_rows("irrigate at dawn", 10), 2);
        assert_eq!(wrapped_rows("abcdefghijklmnopqrstuvwxy", 10), 3);
    }

    #[test]
    fn insight_scroll_is_bounded_by_text() {
        let text = (1..=30)
            .map(|i| format!("Line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let report = report(InsightResult::generated(text));
        let screen = InsightsScreen::new(&report);

        // 20 rows: 2 header, 1 nav, 2 border leaves 15 text rows
        assert_eq!(screen.max_scroll(Rect::new(0, 0, 80, 20)), 15);

        let short = self::report(InsightResult::generated("Short advice."));
        assert_eq!(InsightsScreen::new(&short).max_scroll(Rect::new(0, 0, 80, 20)), 0);

        // An oversized offset still renders the last page
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        InsightsScreen::new(&report)
            .with_scroll(500)
            .render(area, &mut buf);
        assert!(contents(&buf).contains("Line 30"));
    }

    #[test]
    fn insights_screen_shows_fallback_and_diagnostic() {
        let report = report(InsightResult::fallback("Backend returned 503: loading"));
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        InsightsScreen::new(&report).render(area, &mut buf);

        let text = contents(&buf);
        assert!(text.contains(INSIGHT_FALLBACK));
        assert!(text.contains("Backend returned 503: loading"));
    }
}
