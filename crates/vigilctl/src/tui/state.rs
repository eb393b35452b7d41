//! TUI state - current screen, input mode and key handling
//!
//! Key handling only decides what should happen; the event loop applies the
//! resulting `UiAction` to the console.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vigil_common::filter::parse_date_range;
use vigil_common::panels::{
    TASK_ALERTS, TASK_BOTTLENECKS, TASK_LOGS, TASK_METRICS, TASK_NETWORK, TASK_PERFORMANCE,
    TASK_PORTS, TASK_PROCESSES, TASK_RECOMMENDATIONS, TASK_SYSTEM,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Network,
    Performance,
    Processes,
    Alerts,
    Logs,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Network,
        Screen::Performance,
        Screen::Processes,
        Screen::Alerts,
        Screen::Logs,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Network => "Network",
            Screen::Performance => "Performance",
            Screen::Processes => "Processes",
            Screen::Alerts => "Alerts",
            Screen::Logs => "Logs",
        }
    }

    /// Poll tasks feeding this screen
    pub fn tasks(&self) -> &'static [&'static str] {
        match self {
            Screen::Dashboard => &[TASK_METRICS, TASK_SYSTEM],
            Screen::Network => &[TASK_NETWORK, TASK_PORTS],
            Screen::Performance => &[TASK_PERFORMANCE, TASK_BOTTLENECKS, TASK_RECOMMENDATIONS],
            Screen::Processes => &[TASK_PROCESSES],
            Screen::Alerts => &[TASK_ALERTS],
            Screen::Logs => &[TASK_LOGS],
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `'1'` is the dashboard
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// What the bottom line is currently collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    ProcessSearch(String),
    LogSearch(String),
    DateRange(String),
}

impl InputMode {
    pub fn prompt(&self) -> Option<(&'static str, &str)> {
        match self {
            InputMode::Normal => None,
            InputMode::ProcessSearch(text) => Some(("Process name: ", text)),
            InputMode::LogSearch(text) => Some(("Search logs: ", text)),
            InputMode::DateRange(text) => Some(("Dates (YYYY-MM-DD..YYYY-MM-DD): ", text)),
        }
    }
}

/// Effect of a key press on the console
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    None,
    Quit,
    /// Refresh every task of the current screen
    Refresh,
    ProcessSearch(String),
    LogSearch(String),
    CycleLevel,
    DateRange(Option<NaiveDate>, Option<NaiveDate>),
    PrevPage,
    NextPage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuiState {
    pub screen: Screen,
    pub input: InputMode,
    pub show_help: bool,
    /// One-line notice shown in the status bar until the next key
    pub notice: Option<String>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            screen: Screen::Dashboard,
            input: InputMode::Normal,
            show_help: false,
            notice: None,
        }
    }
}

impl TuiState {
    pub fn handle_key(&mut self, key: KeyEvent) -> UiAction {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            return UiAction::Quit;
        }
        self.notice = None;

        if self.input == InputMode::Normal {
            self.handle_normal_key(key)
        } else {
            self.handle_input_key(key)
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> UiAction {
        if self.show_help {
            if matches!(key.code, KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return UiAction::None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => UiAction::Quit,
            (KeyCode::F(1), _) | (KeyCode::Char('?'), _) => {
                self.show_help = true;
                UiAction::None
            }
            (KeyCode::Tab, _) => {
                self.screen = self.screen.next();
                UiAction::None
            }
            (KeyCode::BackTab, _) => {
                self.screen = self.screen.prev();
                UiAction::None
            }
            (KeyCode::Char(c), _) if c.is_ascii_digit() => {
                if let Some(screen) = Screen::from_digit(c) {
                    self.screen = screen;
                }
                UiAction::None
            }
            (KeyCode::Char('r'), _) => UiAction::Refresh,
            (KeyCode::Char('/'), _) => {
                match self.screen {
                    Screen::Processes => self.input = InputMode::ProcessSearch(String::new()),
                    Screen::Logs => self.input = InputMode::LogSearch(String::new()),
                    _ => {}
                }
                UiAction::None
            }
            _ if self.screen == Screen::Logs => self.handle_logs_key(key),
            _ => UiAction::None,
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Char('l') => UiAction::CycleLevel,
            KeyCode::Char('d') => {
                self.input = InputMode::DateRange(String::new());
                UiAction::None
            }
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => UiAction::NextPage,
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => UiAction::PrevPage,
            _ => UiAction::None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Esc => {
                self.input = InputMode::Normal;
                UiAction::None
            }
            KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.input, InputMode::Normal);
                self.submit(mode)
            }
            KeyCode::Backspace => {
                if let Some(text) = self.input_text_mut() {
                    text.pop();
                }
                UiAction::None
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.input_text_mut() {
                    text.push(c);
                }
                UiAction::None
            }
            _ => UiAction::None,
        }
    }

    fn input_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.input {
            InputMode::Normal => None,
            InputMode::ProcessSearch(text)
            | InputMode::LogSearch(text)
            | InputMode::DateRange(text) => Some(text),
        }
    }

    fn submit(&mut self, mode: InputMode) -> UiAction {
        match mode {
            InputMode::Normal => UiAction::None,
            InputMode::ProcessSearch(text) => UiAction::ProcessSearch(text.trim().to_string()),
            InputMode::LogSearch(text) => UiAction::LogSearch(text.trim().to_string()),
            InputMode::DateRange(text) => match parse_date_range(&text) {
                Ok((start, end)) => UiAction::DateRange(start, end),
                Err(e) => {
                    self.notice = Some(e);
                    UiAction::None
                }
            },
        }
    }
}
