use crate::board::Board;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::fetch::{BadgeContext, Fetcher, Limits};
use crate::jira::JiraSource;
use crate::scanner::{PollLoop, Scanner};
use crate::ui;
use chrono::{DateTime, Local};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Snapshot of the poll loop for the status bar
pub struct StatusInfo<'a> {
  pub last_cycle: Option<DateTime<Local>>,
  pub in_flight: usize,
  pub errors: usize,
  pub polling: bool,
  pub last_error: Option<&'a str>,
}

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Ticket source, also used to load the board
  source: JiraSource,

  /// Badge fetcher sharing the session's cache and counters
  fetcher: Fetcher<JiraSource>,

  /// Cards and banners being rendered
  board: Board,

  /// Selected card index
  selected: usize,

  /// Whether the board issues are being loaded
  loading: bool,

  poll: PollLoop,

  last_cycle: Option<DateTime<Local>>,

  /// Last error outside badge fetching (board loading)
  last_error: Option<String>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let source = JiraSource::new(&config)?;
    let limits = Limits::from(&config.poll);
    let fetcher = Fetcher::new(source.clone(), Arc::new(BadgeContext::new(limits)));
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      poll: PollLoop::new(limits.error_limit),
      config,
      source,
      fetcher,
      board: Board::default(),
      selected: 0,
      loading: true,
      last_cycle: None,
      last_error: None,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();
    let scanner = Scanner::new(self.fetcher.clone(), events.sender());

    // First cycle waits one period, giving the board time to load
    let period = self.config.poll.interval();
    let mut poll_timer = interval_at(Instant::now() + period, period);
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    self.load_board();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      tokio::select! {
        Some(event) = events.next() => self.handle_event(event),
        _ = poll_timer.tick(), if self.poll.is_running() => {
          scanner.run_cycle(&mut self.board, &mut self.poll);
          self.last_cycle = Some(Local::now());
        }
        else => break,
      }
    }

    Ok(())
  }

  fn load_board(&mut self) {
    self.loading = true;
    let tx = self.event_tx.clone();
    let jira = self.source.jira().clone();
    let board_id = self.config.board.id;
    let jql = self.config.board.jql.clone();

    tokio::spawn(async move {
      match jira.get_board_issues(board_id, jql.as_deref()).await {
        Ok(issues) => {
          let _ = tx.send(Event::BoardLoaded(issues));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(e.to_string()));
        }
      }
    });
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::BoardLoaded(issues) => {
        info!(count = issues.len(), "board loaded");
        self.board.set_issues(issues);
        self.loading = false;
        self.selected = self
          .selected
          .min(self.board.cards().len().saturating_sub(1));
      }
      Event::Badges { key, badges } => {
        self.board.render_badges(&key, &badges);
      }
      Event::Error(msg) => {
        error!("{}", msg);
        self.loading = false;
        self.last_error = Some(msg);
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Char('r') if !self.loading => {
        self.last_error = None;
        self.load_board();
      }
      _ => {}
    }
  }

  fn move_selection(&mut self, delta: isize) {
    let len = self.board.cards().len();
    if len == 0 {
      return;
    }
    self.selected = self
      .selected
      .saturating_add_signed(delta)
      .min(len - 1);
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn title(&self) -> Option<&str> {
    self.config.title.as_deref()
  }

  pub fn jira_url(&self) -> &str {
    &self.config.jira.url
  }

  pub fn board_id(&self) -> u64 {
    self.config.board.id
  }

  pub fn status(&self) -> StatusInfo<'_> {
    let ctx = self.fetcher.context();
    StatusInfo {
      last_cycle: self.last_cycle,
      in_flight: ctx.in_flight(),
      errors: ctx.errors(),
      polling: self.poll.is_running(),
      last_error: self.last_error.as_deref(),
    }
  }
}
