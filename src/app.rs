//! Terminal front end: layout, key handling and the main loop

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::acquisition::{acquire, parse_dropped_path};
use crate::event_source::EventSource;
use crate::notification::NotificationManager;
use crate::pdf::PdfDecoder;
use crate::resize::TerminalViewport;
use crate::viewer::{Viewer, ViewerConfig};
use crate::widget::{ControlsBar, OpenPrompt, PageView, StatusLine, UploadBox};

pub const TITLE: &str = "PDF Viewer";

/// Header, controls and status rows around the page
const CHROME_ROWS: u16 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a path to open
    OpenPrompt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

pub struct App {
    viewer: Viewer,
    notifications: NotificationManager,
    viewport: TerminalViewport,
    mode: Mode,
    scroll: u16,
    shown_page: Option<usize>,
    page_area_height: u16,
}

impl App {
    pub fn new<D: PdfDecoder>(
        decoder: D,
        viewport: TerminalViewport,
        (columns, rows): (u16, u16),
        config: ViewerConfig,
    ) -> Self {
        let geometry = viewport.geometry_for(columns, rows);
        Self {
            viewer: Viewer::new(decoder, geometry, config),
            notifications: NotificationManager::new(),
            viewport,
            mode: Mode::Normal,
            scroll: 0,
            shown_page: None,
            page_area_height: rows.saturating_sub(CHROME_ROWS),
        }
    }

    /// Read `path` and hand it to the viewer, reporting failures
    pub fn open_path(&mut self, path: &Path) {
        info!("Opening {}", path.display());
        let opened = acquire(path).and_then(|selection| self.viewer.open(selection));
        if let Err(e) = opened {
            self.notifications.acquire_failed(&e);
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(*key),
            Event::Resize(columns, rows) => {
                self.page_area_height = rows.saturating_sub(CHROME_ROWS);
                let geometry = self.viewport.geometry_for(*columns, *rows);
                self.viewer.on_resize(geometry);
                None
            }
            Event::Paste(text) => {
                self.handle_paste(text);
                None
            }
            _ => None,
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if let Mode::OpenPrompt(input) = &mut self.mode {
            input.push_str(text);
            return;
        }
        match parse_dropped_path(text) {
            Some(path) => self.open_path(&path),
            None => debug!("Ignoring empty paste"),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }

        if let Mode::OpenPrompt(input) = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let typed = std::mem::take(input);
                    self.mode = Mode::Normal;
                    if let Some(path) = parse_dropped_path(&typed) {
                        self.open_path(&path);
                    }
                }
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Char('o') => self.mode = Mode::OpenPrompt(String::new()),
            KeyCode::Char('l' | 'n') | KeyCode::Right | KeyCode::PageDown => {
                self.viewer.next_page();
            }
            KeyCode::Char('h' | 'p') | KeyCode::Left | KeyCode::PageUp => {
                self.viewer.previous_page();
            }
            KeyCode::Char('c' | 'x') => self.viewer.close(),
            KeyCode::Char('j') | KeyCode::Down => {
                let max = PageView::max_scroll(self.viewer.surface(), self.page_area_height);
                self.scroll = self.scroll.saturating_add(1).min(max);
            }
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Esc => {
                self.notifications.dismiss_current();
            }
            _ => {}
        }
        None
    }

    /// Apply finished renders and expire old notifications
    pub fn tick(&mut self) {
        for event in self.viewer.pump() {
            self.notifications.viewer_event(&event);
        }
        self.sync_scroll();
        self.notifications.update();
    }

    /// Wait for the worker to go idle, then apply everything it produced
    pub fn settle(&mut self, timeout: Duration) {
        for event in self.viewer.settle(timeout) {
            self.notifications.viewer_event(&event);
        }
        self.sync_scroll();
    }

    /// A new page starts at the top
    fn sync_scroll(&mut self) {
        let page = self.viewer.current_page();
        if page != self.shown_page {
            self.shown_page = page;
            self.scroll = 0;
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        let header = Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(header, chunks[0]);

        let body = chunks[1];
        match self.viewer.document() {
            Some(document) => {
                let [controls, page] = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(2), Constraint::Min(0)])
                    .areas(body);
                f.render_widget(
                    ControlsBar {
                        file_name: &document.name,
                        current_page: self.viewer.current_page().unwrap_or(1),
                        page_count: document.page_count,
                        can_retreat: self.viewer.can_retreat(),
                        can_advance: self.viewer.can_advance(),
                    },
                    controls,
                );
                self.draw_page(f, page);
            }
            None => {
                let message = if self.viewer.is_loading() {
                    Paragraph::new("Loading...").alignment(Alignment::Center)
                } else {
                    Paragraph::default()
                };
                f.render_widget(message, Rect { height: 1, ..body });
                f.render_widget(UploadBox, UploadBox::placement(body));
            }
        }

        match &self.mode {
            Mode::OpenPrompt(input) => f.render_widget(OpenPrompt { input }, chunks[2]),
            Mode::Normal => f.render_widget(
                StatusLine {
                    notification: self.notifications.current(),
                    document_open: self.viewer.document().is_some(),
                },
                chunks[2],
            ),
        }
    }

    fn draw_page(&mut self, f: &mut Frame, area: Rect) {
        self.page_area_height = area.height;
        let surface = self.viewer.surface();
        self.scroll = self
            .scroll
            .min(PageView::max_scroll(surface, area.height));
        f.render_widget(PageView::new(surface).scroll(self.scroll), area);
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Shut the render worker down
    pub fn teardown(&mut self) {
        self.viewer.teardown();
    }
}

/// Drive `app` until it asks to quit.
///
/// Each pass applies worker output, redraws, then drains pending input.
pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        app.tick();
        terminal.draw(|f| app.draw(f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event_source.poll(timeout)? {
            let mut events_processed = 0;
            loop {
                let event = event_source.read()?;
                events_processed += 1;
                if app.handle_event(&event) == Some(AppAction::Quit) {
                    info!("Quit requested");
                    return Ok(());
                }
                if events_processed >= 50 || !event_source.poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_source::SimulatedEventSource;
    use crate::test_utils::FakeDecoder;
    use ratatui::backend::TestBackend;

    const SETTLE: Duration = Duration::from_secs(5);

    fn app(pages: usize) -> App {
        App::new(
            FakeDecoder::with_pages(pages),
            TerminalViewport::new(1),
            (80, 40),
            ViewerConfig::default(),
        )
    }

    fn write_pdf(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.7 fake").unwrap();
        path
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_screen_invites_an_upload() {
        let mut app = app(3);
        let text = screen(&mut app);
        assert!(text.contains(TITLE));
        assert!(text.contains("Press o to open a PDF"));
        assert!(!text.contains("Page 1 / 3"));
    }

    #[test]
    fn open_prompt_types_and_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "report.pdf");
        let mut app = app(3);

        app.handle_event(&SimulatedEventSource::char_key('o'));
        assert_eq!(app.mode(), &Mode::OpenPrompt(String::new()));
        for c in path.to_string_lossy().chars() {
            app.handle_event(&SimulatedEventSource::char_key(c));
        }
        app.handle_event(&SimulatedEventSource::key_event(
            KeyCode::Enter,
            KeyModifiers::empty(),
        ));
        app.settle(SETTLE);

        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(app.viewer().current_page(), Some(1));
        let text = screen(&mut app);
        assert!(text.contains("File: report.pdf"));
        assert!(text.contains("Page 1 / 3"));
    }

    #[test]
    fn q_in_prompt_is_text_not_quit() {
        let mut app = app(1);
        app.handle_event(&SimulatedEventSource::char_key('o'));
        assert_eq!(app.handle_event(&SimulatedEventSource::char_key('q')), None);
        assert_eq!(app.mode(), &Mode::OpenPrompt("q".to_string()));

        app.handle_event(&SimulatedEventSource::key_event(
            KeyCode::Esc,
            KeyModifiers::empty(),
        ));
        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(
            app.handle_event(&SimulatedEventSource::char_key('q')),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app(1);
        app.handle_event(&SimulatedEventSource::char_key('o'));
        assert_eq!(
            app.handle_event(&SimulatedEventSource::ctrl_char_key('c')),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn non_pdf_paste_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut app = app(1);

        app.handle_event(&SimulatedEventSource::paste(path.to_string_lossy()));

        let current = app.notifications().current().unwrap();
        assert_eq!(current.message, "Please select a valid PDF file!");
        assert!(app.viewer().document().is_none());
        assert!(!app.viewer().is_loading());
    }

    #[test]
    fn scroll_resets_on_page_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "tall.pdf");
        let mut app = app(3);
        app.open_path(&path);
        app.settle(SETTLE);

        // Page needs 47 rows, the page area has 34
        app.handle_event(&SimulatedEventSource::char_key('j'));
        app.handle_event(&SimulatedEventSource::char_key('j'));
        assert_eq!(app.scroll(), 2);

        app.handle_event(&SimulatedEventSource::char_key('l'));
        app.settle(SETTLE);
        assert_eq!(app.viewer().current_page(), Some(2));
        assert_eq!(app.scroll(), 0);
    }

    #[test]
    fn run_loop_exits_on_quit() {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        let mut app = app(2);
        let mut events = SimulatedEventSource::new(vec![
            SimulatedEventSource::char_key('l'),
            SimulatedEventSource::resize(100, 40),
            SimulatedEventSource::char_key('q'),
        ]);

        run_app_with_event_source(&mut terminal, &mut app, &mut events).unwrap();
        assert!(app.viewer().document().is_none());
    }
}
