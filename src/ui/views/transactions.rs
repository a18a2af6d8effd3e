use crate::api::Transaction;
use crate::controller::{Filter, Snapshot};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{approval_color, format_amount, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

/// Draw the transaction table
pub fn draw_transactions(
  frame: &mut Frame,
  area: Rect,
  snapshot: &Snapshot,
  state: &mut TableState,
) {
  ensure_valid_selection(state, snapshot.transactions.len());

  let block = Block::default()
    .title(table_title(snapshot))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if snapshot.transactions.is_empty() {
    let content = if snapshot.transactions_loading {
      "Loading transactions..."
    } else {
      "No transactions."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let header = Row::new(vec!["", "Date", "Employee", "Merchant", "Amount"])
    .style(Style::default().fg(Color::DarkGray).bold());

  let rows: Vec<Row> = snapshot
    .transactions
    .iter()
    .map(|t| transaction_row(snapshot, t))
    .collect();

  let table = Table::new(
    rows,
    [
      Constraint::Length(3),
      Constraint::Length(10),
      Constraint::Length(20),
      Constraint::Min(20),
      Constraint::Length(14),
    ],
  )
  .header(header)
  .block(block)
  .row_highlight_style(
    Style::default()
      .bg(Color::DarkGray)
      .add_modifier(Modifier::BOLD),
  )
  .highlight_symbol("> ");

  frame.render_stateful_widget(table, area, state);
}

/// Draw the "view more" line under the table, if it applies
pub fn draw_view_more(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
  if !snapshot.view_more_visible() {
    return;
  }

  let line = if snapshot.transactions_loading {
    Line::from(Span::styled(
      " Loading more...",
      Style::default().fg(Color::Yellow),
    ))
  } else if snapshot.view_more_enabled() {
    Line::from(vec![
      Span::styled(" <m>", Style::default().fg(Color::Cyan)),
      Span::styled(" View More", Style::default().fg(Color::White)),
    ])
  } else {
    Line::from(Span::styled(
      " No more transactions",
      Style::default().fg(Color::DarkGray),
    ))
  };

  frame.render_widget(Paragraph::new(line), area);
}

fn transaction_row<'a>(snapshot: &Snapshot, transaction: &'a Transaction) -> Row<'a> {
  let employee = snapshot
    .employee_name(&transaction.employee_id)
    .unwrap_or_else(|| transaction.employee_id.clone());
  let mark = if transaction.approved { "[x]" } else { "[ ]" };

  Row::new(vec![
    Cell::from(Span::styled(
      mark,
      Style::default().fg(approval_color(transaction.approved)),
    )),
    Cell::from(transaction.date.format("%Y-%m-%d").to_string()),
    Cell::from(truncate(&employee, 20)),
    Cell::from(transaction.merchant.as_str()),
    Cell::from(
      Line::from(format_amount(transaction.amount)).alignment(Alignment::Right),
    ),
  ])
}

/// Block title: filter plus row count or loading state
pub fn table_title(snapshot: &Snapshot) -> String {
  let scope = match &snapshot.filter {
    Filter::All => "All Employees".to_string(),
    Filter::Employee(id) => snapshot
      .employee_name(id)
      .unwrap_or_else(|| id.clone()),
  };

  if snapshot.transactions_loading {
    format!(" Transactions [{}] (loading...) ", scope)
  } else {
    format!(
      " Transactions [{}] ({}) ",
      scope,
      snapshot.transactions.len()
    )
  }
}
