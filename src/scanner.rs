//! Board scanning and the poll loop state machine.
//!
//! Each poll cycle walks every card on the board and makes sure it shows the
//! badges for its key: straight from the cache when possible, otherwise by
//! starting a fetch whose result comes back as an [`Event::Badges`].

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::badges::BadgeSet;
use crate::board::{summary_entries, Board};
use crate::event::Event;
use crate::fetch::{Fetcher, TicketSource};

/// Version shown in the metadata banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
  Running,
  /// Terminal: the error budget is spent and no further cycles run
  Stopped,
}

/// Tracks whether polling may continue.
#[derive(Debug)]
pub struct PollLoop {
  state: PollState,
  error_limit: usize,
}

impl PollLoop {
  pub fn new(error_limit: usize) -> Self {
    Self {
      state: PollState::Running,
      error_limit,
    }
  }

  pub fn is_running(&self) -> bool {
    self.state == PollState::Running
  }

  /// Decide whether another cycle may be scheduled.
  pub fn after_cycle(&mut self, errors: usize) -> PollState {
    if self.state == PollState::Running && errors >= self.error_limit {
      error!(errors, "Detected too many errors - stopping");
      self.state = PollState::Stopped;
    }
    self.state
  }
}

/// What one scan did, for logging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
  /// Cards left alone because they already show cached badges
  pub settled: usize,
  /// Cards rendered from the cache
  pub from_cache: usize,
  /// Fetches started
  pub fetching: usize,
  /// Cards skipped because the fetch limit was reached
  pub skipped: usize,
}

pub struct Scanner<S> {
  fetcher: Fetcher<S>,
  tx: mpsc::UnboundedSender<Event>,
}

impl<S: TicketSource> Scanner<S> {
  pub fn new(fetcher: Fetcher<S>, tx: mpsc::UnboundedSender<Event>) -> Self {
    Self { fetcher, tx }
  }

  pub fn fetcher(&self) -> &Fetcher<S> {
    &self.fetcher
  }

  /// Run one poll cycle if polling is still running.
  ///
  /// Once the error budget is spent the error banner is shown and the
  /// returned state is [`PollState::Stopped`].
  pub fn run_cycle(&self, board: &mut Board, poll: &mut PollLoop) -> PollState {
    if !poll.is_running() {
      return PollState::Stopped;
    }

    board.show_metadata(VERSION);
    let stats = self.scan(board);
    board.set_summary(summary_entries(&self.fetcher.context().badge_counts()));
    debug!(?stats, "scan complete");

    let state = poll.after_cycle(self.fetcher.context().errors());
    if state == PollState::Stopped && board.show_error() {
      info!("error banner shown");
    }
    state
  }

  /// Bring every card's badges up to date, starting fetches where needed.
  pub fn scan(&self, board: &mut Board) -> ScanStats {
    let ctx = self.fetcher.context();
    if ctx.clear_cache_if_expired() {
      info!("badge cache expired, cleared");
    }

    let targets: Vec<(String, bool)> = board
      .cards()
      .iter()
      .map(|card| (card.key.clone(), card.has_badges()))
      .collect();

    let mut stats = ScanStats::default();
    for (key, has_badges) in targets {
      let cached = ctx.cached(&key);
      if has_badges && cached.is_some() {
        stats.settled += 1;
        continue;
      }

      if let Some(entry) = cached {
        board.render_badges(&key, &entry.badges());
        stats.from_cache += 1;
        continue;
      }

      match self.fetcher.try_begin(&key) {
        Some(permit) => {
          let fetcher = self.fetcher.clone();
          let tx = self.tx.clone();
          tokio::spawn(async move {
            let key = permit.key().to_string();
            let badges = fetcher.complete(permit).await;
            // The app may have shut down; nothing left to render into
            let _ = tx.send(Event::Badges { key, badges });
          });
          stats.fetching += 1;
        }
        None => {
          board.render_badges(&key, &BadgeSet::new());
          stats.skipped += 1;
        }
      }
    }

    stats
  }
}
