use crate::logic::pipeline::AnalysisReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Parameters,
    Insights,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Parameters),
            '2' => Some(Screen::Insights),
            _ => None,
        }
    }
}

pub struct ParametersState {
    pub selected_index: usize,
}

impl ParametersState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

pub struct InsightsState {
    pub scroll: u16,
    /// Last offset that still shows text, as measured at the latest draw.
    pub max_scroll: u16,
}

impl InsightsState {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            max_scroll: 0,
        }
    }

    pub fn set_max_scroll(&mut self, max: u16) {
        self.max_scroll = max;
        self.scroll = self.scroll.min(max);
    }

    pub fn down(&mut self) {
        if self.scroll < self.max_scroll {
            self.scroll += 1;
        }
    }

    pub fn up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

/// Read-only viewer over one finished analysis.
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub report: AnalysisReport,
    pub parameters_state: ParametersState,
    pub insights_state: InsightsState,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(report: AnalysisReport) -> Self {
        Self {
            screen: Screen::Parameters,
            should_quit: false,
            report,
            parameters_state: ParametersState::new(),
            insights_state: InsightsState::new(),
            status_message: None,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn select_next(&mut self) {
        let count = self.report.projections.len();
        self.parameters_state.next(count);
    }

    pub fn select_prev(&mut self) {
        self.parameters_state.prev();
    }
}
