use super::KeyResult;
use crate::api::Employee;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the employee picker that the app needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
  /// Employee chosen (may be the "All Employees" sentinel)
  Selected(Employee),
  /// Picker dismissed without a choice
  Cancelled,
}

/// Overlay for choosing the employee filter
#[derive(Debug, Clone, Default)]
pub struct EmployeePicker {
  active: bool,
  options: Vec<Employee>,
  selected: usize,
}

impl EmployeePicker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if picker is currently active
  #[cfg(test)]
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker with the cursor on `current_id`
  pub fn show(&mut self, options: Vec<Employee>, current_id: &str) {
    self.selected = options.iter().position(|e| e.id == current_id).unwrap_or(0);
    self.options = options;
    self.active = true;
  }

  /// Hide the picker
  pub fn hide(&mut self) {
    self.active = false;
    self.options.clear();
    self.selected = 0;
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(PickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let event = match self.options.get(self.selected) {
          Some(employee) => PickerEvent::Selected(employee.clone()),
          None => PickerEvent::Cancelled,
        };
        self.hide();
        KeyResult::Event(event)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.options.is_empty() {
          self.selected = (self.selected + 1) % self.options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.options.is_empty() {
          self.selected = if self.selected == 0 {
            self.options.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.options.is_empty() {
      return;
    }

    let max_name_len = self
      .options
      .iter()
      .map(|e| e.full_name().chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_name_len as u16 + 6)
      .min(area.width.saturating_sub(4))
      .max(24);
    let height = (self.options.len() as u16 + 2)
      .min(area.height.saturating_sub(4))
      .max(3);

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filter by employee ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .options
      .iter()
      .map(|employee| {
        let style = if employee.is_empty_sentinel() {
          Style::default().fg(Color::White).italic()
        } else {
          Style::default().fg(Color::Cyan)
        };
        ListItem::new(Line::from(Span::styled(employee.full_name(), style)))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
