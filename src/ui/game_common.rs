//! Shared layout pieces: bordered frame, status bar, info panel, modal panels.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const INFO_PANEL_WIDTH: u16 = 24;

/// Screen areas of the race layout.
pub struct RaceLayout {
    /// Play field: fixed size, centred horizontally, clipped to the terminal
    pub field: Rect,
    /// Status bar (2 lines) under the field column
    pub status_bar: Rect,
    /// Info panel on the right, drawn with its own border
    pub info_panel: Rect,
}

/// Outer " Racer " border split into the field column and the info panel.
///
/// ```text
/// ┌─ Racer ─────────────────────────┬─ Info ──────┐
/// │   [field cols x rows]           │             │
/// │                                 │  [info]     │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
pub fn create_race_layout(
    frame: &mut Frame,
    area: Rect,
    field_cols: u16,
    field_rows: u16,
) -> RaceLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Racer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightRed));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(inner);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(columns[0]);

    let content = rows[0];
    let width = field_cols.min(content.width);
    let height = field_rows.min(content.height);
    let field = Rect::new(
        content.x + (content.width - width) / 2,
        content.y,
        width,
        height,
    );

    RaceLayout {
        field,
        status_bar: rows[1],
        info_panel: columns[1],
    }
}

/// Two-line status bar: the status word, then `[key] action` hints.
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: Span, controls: &[(&str, &str)]) {
    if area.height < 1 {
        return;
    }

    let status = Paragraph::new(Line::from(status)).alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height < 2 {
        return;
    }
    let mut spans = Vec::new();
    for (key, action) in controls {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

/// Info panel border with the standard " Info " title. Returns the inner area.
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Centre a `width x height` box inside `area`, shrinking it to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Bordered panel centred over `area`. Only the panel itself is cleared, so
/// the scene stays visible around it.
pub fn render_modal(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    lines: Vec<Line>,
) {
    let width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .max(title.chars().count()) as u16
        + 6;
    let height = lines.len() as u16 + 2;
    let modal_area = centered_rect(area, width, height);

    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        )
        .title(title);

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn layout_for(width: u16, height: u16) -> (Rect, Rect, Rect) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut areas = None;
        terminal
            .draw(|frame| {
                let area = frame.size();
                let layout = create_race_layout(frame, area, 84, 32);
                areas = Some((layout.field, layout.status_bar, layout.info_panel));
            })
            .unwrap();
        areas.unwrap()
    }

    #[test]
    fn test_race_layout_fits_full_field() {
        let (field, status_bar, info_panel) = layout_for(120, 40);
        assert_eq!((field.width, field.height), (84, 32));
        assert_eq!(info_panel.width, INFO_PANEL_WIDTH);
        assert_eq!(status_bar.height, 2);
        assert!(field.right() <= info_panel.x);
        assert!(field.bottom() <= status_bar.y);
    }

    #[test]
    fn test_race_layout_clips_field_on_small_terminal() {
        let (field, _, _) = layout_for(60, 12);
        assert!(field.width < 84);
        assert!(field.height < 32);
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(10, 5, 40, 20);
        let r = centered_rect(area, 20, 10);
        assert_eq!(r, Rect::new(20, 10, 20, 10));
    }

    #[test]
    fn test_centered_rect_shrinks() {
        let area = Rect::new(0, 0, 10, 4);
        let r = centered_rect(area, 30, 30);
        assert_eq!(r, area);
    }
}
