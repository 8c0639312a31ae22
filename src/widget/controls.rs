use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::notification::{Notification, NotificationLevel};

pub const PREVIOUS_LABEL: &str = "◀ Previous";
pub const NEXT_LABEL: &str = "Next ▶";
pub const CLOSE_LABEL: &str = "✕ Close";

fn button(label: &str, enabled: bool) -> Span<'_> {
    let style = if enabled {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };
    Span::styled(format!(" {label} "), style)
}

/// File name and the navigation buttons above the page
pub struct ControlsBar<'a> {
    pub file_name: &'a str,
    pub current_page: usize,
    pub page_count: usize,
    pub can_retreat: bool,
    pub can_advance: bool,
}

impl Widget for ControlsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let file = Line::from(Span::styled(
            format!("File: {}", self.file_name),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let navigation = Line::from(vec![
            button(PREVIOUS_LABEL, self.can_retreat),
            Span::raw("  "),
            Span::styled(
                format!("Page {} / {}", self.current_page, self.page_count),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            button(NEXT_LABEL, self.can_advance),
            Span::raw("  "),
            Span::styled(
                format!(" {CLOSE_LABEL} "),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
        ]);

        Paragraph::new(vec![file, navigation])
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Shown while no document is open
pub struct UploadBox;

impl UploadBox {
    pub const WIDTH: u16 = 48;
    pub const HEIGHT: u16 = 7;

    /// Centered placement inside `area`
    pub fn placement(area: Rect) -> Rect {
        let width = Self::WIDTH.min(area.width);
        let height = Self::HEIGHT.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for UploadBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));
        let text = vec![
            Line::default(),
            Line::from("Press o to open a PDF"),
            Line::from("or drag & drop a file here"),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block)
            .render(area, buf);
    }
}

/// Path input line for the open prompt
pub struct OpenPrompt<'a> {
    pub input: &'a str,
}

impl Widget for OpenPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(vec![
            Span::styled("Open: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(self.input),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
        .render(area, buf);
    }
}

/// Bottom line: the newest notification, or key help
pub struct StatusLine<'a> {
    pub notification: Option<&'a Notification>,
    pub document_open: bool,
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.notification {
            Some(notification) => {
                let style = match notification.level {
                    NotificationLevel::Info => Style::default().fg(Color::Black).bg(Color::Gray),
                    NotificationLevel::Warning => {
                        Style::default().fg(Color::Black).bg(Color::Yellow)
                    }
                    NotificationLevel::Error => Style::default().fg(Color::White).bg(Color::Red),
                };
                Line::from(Span::styled(format!(" {} ", notification.message), style))
                    .centered()
            }
            None if self.document_open => Line::from(Span::styled(
                "h/l: Page | j/k: Scroll | o: Open | c: Close | q: Quit",
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::from(Span::styled(
                "o: Open | q: Quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        line.render(area, buf);
    }
}
