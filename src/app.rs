use crate::api::Source;
use crate::config::Config;
use crate::controller::{Filter, Snapshot};
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{EmployeePicker, KeyResult, PickerEvent};
use crate::worker::{self, Action, WorkerHandle};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::TableState;
use std::io::stdout;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Main application state
pub struct App {
  /// Header title
  title: String,

  /// Where the data comes from, shown in the header
  source_label: String,

  /// Background controller
  worker: WorkerHandle,

  /// Last state read from the worker
  snapshot: Snapshot,

  /// Table cursor
  table_state: TableState,

  /// Employee filter overlay
  picker: EmployeePicker,

  /// Message shown in the status bar
  status: Option<String>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, source: Source, event_tx: mpsc::UnboundedSender<Event>) -> Self {
    let source_label = source.describe();
    Self {
      title: config.title().to_string(),
      source_label,
      worker: worker::spawn(source, event_tx),
      snapshot: Snapshot::default(),
      table_state: TableState::default(),
      picker: EmployeePicker::new(),
      status: None,
      should_quit: false,
    }
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn source_label(&self) -> &str {
    &self.source_label
  }

  pub fn snapshot(&self) -> &Snapshot {
    &self.snapshot
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  pub fn picker(&self) -> &EmployeePicker {
    &self.picker
  }

  pub fn table_state_mut(&mut self) -> &mut TableState {
    &mut self.table_state
  }

  #[cfg(test)]
  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub async fn run(&mut self, mut events: EventHandler) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.main_loop(&mut events).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self, events: &mut EventHandler) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    self.worker.send(Action::Mount);

    while !self.should_quit {
      self.sync_snapshot();
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  /// Pull the latest state published by the worker
  pub fn sync_snapshot(&mut self) {
    self.snapshot = self.worker.snapshot();
  }

  pub fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {}
      Event::Error(message) => {
        warn!(%message, "background operation failed");
        self.status = Some(message);
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    // Picker overlay takes keys first
    match self.picker.handle_key(key) {
      KeyResult::Event(PickerEvent::Selected(employee)) => {
        debug!(employee_id = %employee.id, "filter selected");
        self.table_state.select(Some(0));
        self.worker.send(Action::Select(Some(employee)));
        return;
      }
      KeyResult::Event(PickerEvent::Cancelled) | KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true
      }
      KeyCode::Esc => self.status = None,
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select(Some(0)),
      KeyCode::Char('G') | KeyCode::End => {
        let len = self.snapshot.transactions.len();
        self.table_state.select(len.checked_sub(1));
      }
      KeyCode::Char('f') | KeyCode::Char('/') => self.open_picker(),
      KeyCode::Char(' ') | KeyCode::Enter => self.toggle_approval(),
      KeyCode::Char('m') => {
        if self.snapshot.view_more_enabled() && !self.snapshot.transactions_loading {
          self.worker.send(Action::ViewMore);
        }
      }
      KeyCode::Char('r') => {
        self.status = None;
        self.worker.send(Action::Refresh);
      }
      _ => {}
    }
  }

  fn move_selection(&mut self, delta: isize) {
    let len = self.snapshot.transactions.len();
    if len == 0 {
      return;
    }
    let current = self.table_state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    self.table_state.select(Some(next as usize));
  }

  fn open_picker(&mut self) {
    let options = self.snapshot.employee_options();
    if options.is_empty() {
      self.status = Some("Employee list not loaded yet".to_string());
      return;
    }

    let current = match &self.snapshot.filter {
      Filter::All => "",
      Filter::Employee(id) => id.as_str(),
    };
    self.picker.show(options, current);
  }

  fn toggle_approval(&mut self) {
    let Some(transaction) = self
      .table_state
      .selected()
      .and_then(|i| self.snapshot.transactions.get(i))
    else {
      return;
    };

    self.worker.send(Action::SetApproval {
      transaction_id: transaction.id.clone(),
      approved: !transaction.approved,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::FixtureSource;
  use std::time::Duration;

  fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn test_app() -> App {
    let (tx, _rx) = mpsc::unbounded_channel();
    let source = Source::Fixture(FixtureSource::sample().unwrap());
    App::new(&Config::default(), source, tx)
  }

  async fn wait_until(app: &mut App, done: impl Fn(&Snapshot) -> bool) {
    let mut rx = app.worker.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
      loop {
        if done(&rx.borrow_and_update()) {
          break;
        }
        rx.changed().await.unwrap();
      }
    })
    .await
    .expect("timed out waiting for snapshot");
    app.sync_snapshot();
  }

  #[tokio::test]
  async fn test_quit_keys() {
    let mut app = test_app();
    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.should_quit());

    let mut app = test_app();
    app.handle_event(Event::Key(KeyEvent::new(
      KeyCode::Char('c'),
      KeyModifiers::CONTROL,
    )));
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_picker_needs_directory() {
    let mut app = test_app();
    app.handle_event(key(KeyCode::Char('f')));
    assert!(!app.picker().is_active());
    assert!(app.status().is_some());

    app.handle_event(key(KeyCode::Esc));
    assert!(app.status().is_none());
  }

  #[tokio::test]
  async fn test_error_event_sets_status() {
    let mut app = test_app();
    app.handle_event(Event::Error("request failed".to_string()));
    assert_eq!(app.status(), Some("request failed"));
  }

  #[tokio::test]
  async fn test_mount_then_filter_by_employee() {
    let mut app = test_app();
    app.worker.send(Action::Mount);
    wait_until(&mut app, |s| {
      s.employees.is_some() && !s.transactions.is_empty() && !s.transactions_loading
    })
    .await;
    assert_eq!(app.snapshot().filter, Filter::All);

    app.handle_event(key(KeyCode::Char('f')));
    assert!(app.picker().is_active());

    // Cursor starts on "All Employees"; move to the first employee
    app.handle_event(key(KeyCode::Char('j')));
    app.handle_event(key(KeyCode::Enter));
    assert!(!app.picker().is_active());

    wait_until(&mut app, |s| {
      matches!(&s.filter, Filter::Employee(_)) && !s.transactions_loading
    })
    .await;
    let Filter::Employee(id) = app.snapshot().filter.clone() else {
      unreachable!()
    };
    assert!(app
      .snapshot()
      .transactions
      .iter()
      .all(|t| t.employee_id == id));
  }

  #[tokio::test]
  async fn test_space_toggles_selected_row() {
    let mut app = test_app();
    app.worker.send(Action::Mount);
    wait_until(&mut app, |s| !s.transactions.is_empty() && !s.transactions_loading).await;

    app.table_state.select(Some(0));
    let first = app.snapshot().transactions[0].clone();
    app.handle_event(key(KeyCode::Char(' ')));

    wait_until(&mut app, |s| {
      s.transactions
        .iter()
        .any(|t| t.id == first.id && t.approved != first.approved)
    })
    .await;
  }

  #[tokio::test]
  async fn test_selection_moves_within_bounds() {
    let mut app = test_app();
    app.worker.send(Action::Mount);
    wait_until(&mut app, |s| !s.transactions.is_empty() && !s.transactions_loading).await;

    let len = app.snapshot().transactions.len();
    app.table_state.select(Some(0));
    app.handle_event(key(KeyCode::Char('k')));
    assert_eq!(app.table_state.selected(), Some(0));

    for _ in 0..len + 3 {
      app.handle_event(key(KeyCode::Char('j')));
    }
    assert_eq!(app.table_state.selected(), Some(len - 1));
  }
}
