use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, data source, active filter and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, source: &str, filter: &str) {
  let header = Line::from(vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", extract_domain(source)),
      Style::default().fg(Color::White),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", filter),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw("  "),
    // Shortcuts - keys highlighted, descriptions dimmed
    Span::styled("<f>", Style::default().fg(Color::Cyan)),
    Span::styled(" filter", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<space>", Style::default().fg(Color::Cyan)),
    Span::styled(" approve", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<r>", Style::default().fg(Color::Cyan)),
    Span::styled(" refresh", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<q>", Style::default().fg(Color::Cyan)),
    Span::styled(" quit", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Host part of an API url; other labels pass through unchanged
fn extract_domain(url: &str) -> &str {
  match url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
  {
    Some(rest) => rest.split('/').next().unwrap_or(rest),
    None => url,
  }
}
