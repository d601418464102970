use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Terminals narrower than this get no sidebar.
const MIN_WIDTH_FOR_SIDEBAR: u16 = 60;
const SIDEBAR_WIDTH: u16 = 28;

/// The regions that make up the TUI layout.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub sidebar: Rect,
    pub header: Rect,
    pub chat_pane: Rect,
    pub input_pane: Rect,
    pub disclaimer: Rect,
}

impl AppLayout {
    /// Calculate layout regions from a `Rect` (terminal area).
    pub fn compute(area: Rect, sidebar_visible: bool) -> Self {
        let sidebar_width = if sidebar_visible && area.width >= MIN_WIDTH_FOR_SIDEBAR {
            SIDEBAR_WIDTH
        } else {
            0
        };

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
            .split(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
                Constraint::Length(1),
            ])
            .split(horizontal[1]);

        AppLayout {
            sidebar: horizontal[0],
            header: vertical[0],
            chat_pane: vertical[1],
            input_pane: vertical[2],
            disclaimer: vertical[3],
        }
    }

    /// Derive the regions from the current frame.
    pub fn new(frame: &Frame, sidebar_visible: bool) -> Self {
        Self::compute(frame.area(), sidebar_visible)
    }

    /// The number of text rows visible inside the chat pane's border.
    pub fn chat_inner_height(&self) -> u16 {
        self.chat_pane.height.saturating_sub(2)
    }

    /// Columns available for text inside the chat pane's border.
    pub fn chat_inner_width(&self) -> u16 {
        self.chat_pane.width.saturating_sub(2)
    }
}
