use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use sonority_core::model::EnrichedRecommendation;
use sonority_core::{Library, Recommender};
use sonority_enrich::Enricher;

pub mod results;
pub mod title_list;

/// Visible table rows assumed until the first frame is drawn.
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TitleList,
    Results,
}

/// Application state for the browser.
#[derive(Debug)]
pub struct App {
    pub view: View,
    /// Distinct catalog titles, sorted.
    pub titles: Vec<String>,
    pub filter: String,
    pub editing_filter: bool,
    /// Index into the filtered titles.
    pub selected: usize,
    pub offset: usize,
    /// Table rows visible in the last drawn frame.
    pub viewport_height: usize,
    /// Title whose recommendations are shown in the results view.
    pub selected_title: Option<String>,
    pub results: Vec<EnrichedRecommendation>,
    /// One-line message shown under the title list.
    pub status: Option<String>,
    /// Title waiting to be recommended on the next loop pass.
    pub pending: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(library: &Library) -> Self {
        Self {
            view: View::TitleList,
            titles: library
                .catalog()
                .unique_titles()
                .into_iter()
                .map(str::to_string)
                .collect(),
            filter: String::new(),
            editing_filter: false,
            selected: 0,
            offset: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            selected_title: None,
            results: Vec::new(),
            status: None,
            pending: None,
            should_quit: false,
        }
    }

    /// Titles matching the current filter, ignoring case.
    pub fn visible_titles(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();
        self.titles
            .iter()
            .map(String::as_str)
            .filter(|title| title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Record how many rows the title table can show and keep the
    /// selection inside them.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.scroll_to_selection();
    }

    fn scroll_to_selection(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.viewport_height {
            self.offset = self.selected + 1 - self.viewport_height;
        }
    }

    /// Record the outcome of a recommendation run and switch views.
    pub fn show_results(&mut self, title: String, results: Vec<EnrichedRecommendation>) {
        self.selected_title = Some(title);
        self.results = results;
        self.status = None;
        self.view = View::Results;
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.view {
            View::TitleList if self.editing_filter => self.handle_filter_key(key),
            View::TitleList => self.handle_title_list_key(key),
            View::Results => self.handle_results_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.filter.push(c),
            KeyCode::Backspace => {
                self.filter.pop();
            }
            KeyCode::Enter | KeyCode::Esc => self.editing_filter = false,
            _ => return,
        }
        self.selected = 0;
        self.offset = 0;
    }

    fn handle_title_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => {
                self.editing_filter = true;
                self.status = None;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.visible_titles().len() {
                    self.selected += 1;
                    self.scroll_to_selection();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.scroll_to_selection();
                }
            }
            KeyCode::Enter => {
                let chosen = self.visible_titles().get(self.selected).map(|t| (*t).to_string());
                if let Some(title) = chosen {
                    self.status = Some(format!("Finding songs similar to \"{title}\"..."));
                    self.pending = Some(title);
                }
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.view = View::TitleList,
            _ => {}
        }
    }
}

/// Run the catalog browser.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(library: &Library, enricher: &Enricher, count: usize) -> Result<()> {
    let app = App::new(library);
    let recommender = Recommender::new(library).with_limit(count);

    enable_raw_mode()?;
    with_restore(
        setup_terminal,
        |mut terminal| {
            let result = run_event_loop(&mut terminal, app, &recommender, enricher);
            terminal.show_cursor()?;
            result
        },
        restore_terminal,
    )
}

/// Run `setup` then `run`, calling `restore` afterwards whether either step
/// failed. The first error wins.
fn with_restore<T, R>(
    setup: impl FnOnce() -> Result<T>,
    run: impl FnOnce(T) -> Result<R>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<R> {
    let result = setup().and_then(run);
    let restored = restore();
    result.and_then(|value| restored.map(|()| value))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    recommender: &Recommender<'_>,
    enricher: &Enricher,
) -> Result<()> {
    loop {
        let view = app.view;
        terminal.draw(|frame| match view {
            View::TitleList => title_list::render(frame, &mut app),
            View::Results => results::render(frame, &app),
        })?;

        // The status line is on screen before the lookups block the loop.
        if let Some(title) = app.pending.take() {
            match recommender.recommend(&title) {
                Ok(recommendations) => {
                    let enriched = tokio::task::block_in_place(|| {
                        tokio::runtime::Handle::current()
                            .block_on(enricher.enrich_all(recommendations))
                    });
                    app.show_results(title, enriched);
                }
                Err(e) => {
                    log::warn!("Recommendation failed for {title}: {e}");
                    app.status = Some(format!("Could not recommend \"{title}\": {e}"));
                }
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
