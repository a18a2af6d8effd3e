pub mod components;
mod renderfns;
mod views;

use crate::app::App;
use crate::controller::Filter;
use ratatui::prelude::*;
use ratatui::widgets::TableState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Transaction table
      Constraint::Length(1), // View more
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let snapshot = app.snapshot().clone();
  let filter_label = match &snapshot.filter {
    Filter::All => "All Employees".to_string(),
    Filter::Employee(id) => snapshot.employee_name(id).unwrap_or_else(|| id.clone()),
  };

  renderfns::draw_header(frame, chunks[0], app.title(), app.source_label(), &filter_label);
  views::draw_transactions(frame, chunks[1], &snapshot, app.table_state_mut());
  views::draw_view_more(frame, chunks[2], &snapshot);
  renderfns::draw_status_bar(
    frame,
    chunks[3],
    app.status(),
    snapshot.transactions_loading || snapshot.employees_loading,
  );

  app.picker().render_overlay(frame, chunks[1]);
}

/// Keep the selection inside the list after it shrinks or grows
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
