//! Race scene rendering.
//!
//! The world is drawn into a fixed cell buffer (road, then NPCs, then the
//! player, then the HUD row) and stamped row by row as Paragraph widgets.
//! State overlays and the surrounding panels are drawn on top afterwards.

use super::game_common::{
    create_race_layout, render_info_panel_frame, render_modal, render_status_bar,
};
use crate::assets::{Assets, Sprite};
use crate::constants::{FIELD_COLS, FIELD_ROWS};
use crate::game::road::Road;
use crate::game::types::Rect as WorldRect;
use crate::game::{GameState, RaceSession};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Cell in the render buffer with foreground and background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Black,
        }
    }
}

/// Play field raster. World coordinates are scaled onto `cols x rows`.
#[derive(Debug, Clone)]
pub struct FieldBuffer {
    cols: usize,
    rows: usize,
    x_scale: f64,
    y_scale: f64,
    cells: Vec<Vec<Cell>>,
}

impl FieldBuffer {
    pub fn new(cols: u16, rows: u16, screen_width: f64, screen_height: f64) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            x_scale: cols as f64 / screen_width,
            y_scale: rows as f64 / screen_height,
            cells: vec![vec![Cell::default(); cols]; rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Text of one row, for inspection.
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|r| r.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// Both road segments, sampled at each cell's centre.
    pub fn draw_road(&mut self, road: &Road, sprite: &Sprite) {
        for (row_idx, row) in self.cells.iter_mut().enumerate() {
            let y = (row_idx as f64 + 0.5) / self.y_scale;
            let Some(fy) = road.tile_fraction_at(y) else {
                continue;
            };
            for (col_idx, cell) in row.iter_mut().enumerate() {
                let fx = (col_idx as f64 + 0.5) / self.cols as f64;
                *cell = Cell {
                    ch: sprite.sample(fx, fy),
                    fg: sprite.fg,
                    bg: sprite.bg,
                };
            }
        }
    }

    /// Stretch `sprite` over the cells covered by `rect`, clipped to the
    /// field. Spaces in the sprite leave the road visible.
    pub fn draw_car(&mut self, rect: WorldRect, sprite: &Sprite) {
        let col_start = (rect.left() as f64 * self.x_scale).floor() as i64;
        let col_end = (rect.right() as f64 * self.x_scale).ceil() as i64;
        let row_start = (rect.top() as f64 * self.y_scale).floor() as i64;
        let row_end = (rect.bottom() as f64 * self.y_scale).ceil() as i64;
        let span_w = (col_end - col_start).max(1) as f64;
        let span_h = (row_end - row_start).max(1) as f64;

        for row in row_start.max(0)..row_end.min(self.rows as i64) {
            let fy = (row - row_start) as f64 / span_h;
            for col in col_start.max(0)..col_end.min(self.cols as i64) {
                let fx = (col - col_start) as f64 / span_w;
                let ch = sprite.sample(fx, fy);
                if ch == ' ' {
                    continue;
                }
                let cell = &mut self.cells[row as usize][col as usize];
                cell.ch = ch;
                cell.fg = sprite.fg;
                if sprite.bg != Color::Reset {
                    cell.bg = sprite.bg;
                }
            }
        }
    }

    /// Write `text` starting at `col`, clipped to the row.
    pub fn draw_text(&mut self, col: usize, row: usize, text: &str, fg: Color) {
        let Some(cells) = self.cells.get_mut(row) else {
            return;
        };
        for (cell, ch) in cells.iter_mut().skip(col).zip(text.chars()) {
            *cell = Cell {
                ch,
                fg,
                bg: Color::Black,
            };
        }
    }

    /// `Score: N` top left, `High Score: N` top right.
    pub fn draw_hud(&mut self, score: u32, high_score: i64) {
        let score_text = format!("Score: {}", score);
        let high_text = format!("High Score: {}", high_score);
        self.draw_text(1, 0, &score_text, Color::White);
        let high_col = self.cols.saturating_sub(high_text.chars().count() + 1);
        self.draw_text(high_col, 0, &high_text, Color::White);
    }
}

/// Draw the session's world into a fresh buffer.
pub fn build_field(session: &RaceSession, assets: &Assets, cols: u16, rows: u16) -> FieldBuffer {
    let mut buffer = FieldBuffer::new(
        cols,
        rows,
        session.config.screen_width,
        session.config.screen_height,
    );

    buffer.draw_road(&session.road, &assets.road);
    for npc in &session.npcs {
        buffer.draw_car(npc.rect(), &assets.npc);
    }
    buffer.draw_car(session.player.rect(), &assets.player);

    if session.state != GameState::ShowingInstructions {
        buffer.draw_hud(session.score.score, session.score.high_score);
    }
    buffer
}

/// Render the full race screen.
pub fn render_race_scene(frame: &mut Frame, area: Rect, session: &RaceSession, assets: &Assets) {
    let layout = create_race_layout(frame, area, FIELD_COLS, FIELD_ROWS);
    let field_area = layout.field;
    let buffer = build_field(session, assets, FIELD_COLS, FIELD_ROWS);
    stamp_buffer(frame, field_area, &buffer);

    match session.state {
        GameState::ShowingInstructions => render_instructions(frame, field_area),
        GameState::GameOver => render_game_over(frame, field_area, session),
        GameState::Playing => {}
    }

    render_status_bar_content(frame, layout.status_bar, session);
    render_info_panel(frame, layout.info_panel, session);
}

/// Stamp buffer rows as styled spans, merging runs of equal colour.
fn stamp_buffer(frame: &mut Frame, area: Rect, buffer: &FieldBuffer) {
    for (row_idx, row_data) in buffer.cells.iter().enumerate().take(area.height as usize) {
        let mut spans: Vec<Span> = Vec::new();
        let mut current_fg = Color::Reset;
        let mut current_bg = Color::Reset;
        let mut current_text = String::new();

        for &cell in row_data.iter().take(area.width as usize) {
            if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut current_text),
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }
            current_fg = cell.fg;
            current_bg = cell.bg;
            current_text.push(cell.ch);
        }
        if !current_text.is_empty() {
            spans.push(Span::styled(
                current_text,
                Style::default().fg(current_fg).bg(current_bg),
            ));
        }

        let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
    }
}

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, Style::default().fg(Color::White)),
        Span::styled(action, Style::default().fg(Color::DarkGray)),
    ])
}

fn render_instructions(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        key_line("Up / W      ", "accelerate"),
        key_line("Down / S    ", "brake"),
        key_line("Left / A    ", "steer left"),
        key_line("Right / D   ", "steer right"),
        Line::from(""),
        Line::from(Span::styled(
            "Pass cars to score. Don't crash.",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Press any key to start]",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    render_modal(frame, area, " How to Play ", Color::Yellow, lines);
}

fn render_game_over(frame: &mut Frame, area: Rect, session: &RaceSession) {
    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Final Score: {}", session.score.score),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            format!("High Score: {}", session.score.high_score),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to Restart",
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            "Esc / Q to Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_modal(frame, area, "", Color::Red, lines);
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, session: &RaceSession) {
    let (status, color, controls): (&str, Color, &[(&str, &str)]) = match session.state {
        GameState::ShowingInstructions => (
            "Ready",
            Color::Yellow,
            &[("[Any]", "Start"), ("[Ctrl+C]", "Exit")],
        ),
        GameState::Playing => (
            "Drive!",
            Color::LightRed,
            &[
                ("[Up/W]", "Gas"),
                ("[Down/S]", "Brake"),
                ("[Left/Right]", "Steer"),
            ],
        ),
        GameState::GameOver => (
            "Crashed",
            Color::Red,
            &[("[R]", "Restart"), ("[Esc/Q]", "Quit")],
        ),
    };
    render_status_bar(
        frame,
        area,
        Span::styled(status, Style::default().fg(color)),
        controls,
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, session: &RaceSession) {
    let inner = render_info_panel_frame(frame, area);

    let speed_pct = if session.config.max_road_speed > 0.0 {
        (session.road_speed / session.config.max_road_speed * 100.0).round() as u32
    } else {
        0
    };

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("State: ", label),
            Span::styled(session.state.name(), Style::default().fg(Color::LightRed)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.1} ({}%)", session.road_speed, speed_pct), value),
        ]),
        Line::from(vec![
            Span::styled("Traffic: ", label),
            Span::styled(
                format!("{}/{}", session.npcs.len(), session.config.max_npcs),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Lanes: ", label),
            Span::styled(session.config.lane_policy.name(), value),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                session.score.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Best: ", label),
            Span::styled(session.score.high_score.to_string(), value),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteKind;
    use crate::config::GameConfig;
    use crate::game::cars::{CarBody, NpcCar};
    use crate::game::types::{NpcId, Position};
    use ratatui::{backend::TestBackend, Terminal};

    fn session() -> RaceSession {
        RaceSession::new(GameConfig::default(), 120)
    }

    #[test]
    fn test_field_has_fixed_size() {
        let buffer = build_field(&session(), &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        assert_eq!(buffer.cols(), 84);
        assert_eq!(buffer.rows(), 32);
    }

    #[test]
    fn test_placeholder_road_is_black() {
        let buffer = build_field(&session(), &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        let cell = buffer.cell(0, 31).unwrap();
        assert_eq!(cell.bg, Color::Black);
    }

    #[test]
    fn test_player_drawn_in_red() {
        let buffer = build_field(&session(), &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        // Player centre (420, 400) maps to column 42, row ~19
        let cell = buffer.cell(42, 20).unwrap();
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.ch, '\u{2588}');
    }

    #[test]
    fn test_npc_drawn_below_player() {
        let mut session = session();
        // NPC on top of the player: the player must win the cell
        session.npcs.push(NpcCar::new(
            NpcId(1),
            CarBody::centered(420.0, 400.0, 50.0, 100.0),
            5.0,
            1,
        ));
        session.npcs.push(NpcCar::new(
            NpcId(2),
            CarBody::at(Position::new(245.0, 0.0), 50.0, 100.0),
            5.0,
            0,
        ));
        let buffer = build_field(&session, &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        assert_eq!(buffer.cell(42, 20).unwrap().fg, Color::Red);
        assert_eq!(buffer.cell(26, 2).unwrap().fg, Color::Blue);
    }

    #[test]
    fn test_offscreen_npc_clipped() {
        let mut session = session();
        session.npcs.push(NpcCar::new(
            NpcId(3),
            CarBody::at(Position::new(245.0, -100.0), 50.0, 100.0),
            5.0,
            0,
        ));
        let buffer = build_field(&session, &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        assert_ne!(buffer.cell(26, 0).unwrap().fg, Color::Blue);
    }

    #[test]
    fn test_hud_hidden_on_instructions() {
        let buffer = build_field(&session(), &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        assert!(!buffer.row_text(0).contains("Score"));
    }

    #[test]
    fn test_hud_shows_scores() {
        let mut session = session();
        session.state = GameState::Playing;
        session.score.score = 30;
        let buffer = build_field(&session, &Assets::placeholders(), FIELD_COLS, FIELD_ROWS);
        let hud = buffer.row_text(0);
        assert!(hud.starts_with(" Score: 30"));
        assert!(hud.trim_end().ends_with("High Score: 120"));
    }

    #[test]
    fn test_road_sprite_scrolls() {
        let mut session = session();
        let road = Sprite::parse("#\n.\n.\n.", SpriteKind::Road).unwrap();
        let assets = Assets {
            road,
            ..Assets::placeholders()
        };
        let before = build_field(&session, &assets, FIELD_COLS, FIELD_ROWS);
        assert_eq!(before.cell(0, 0).unwrap().ch, '#');

        session.road.update(162.5);
        let after = build_field(&session, &assets, FIELD_COLS, FIELD_ROWS);
        assert_eq!(after.cell(0, 0).unwrap().ch, '.');
        assert_eq!(after.cell(0, 8).unwrap().ch, '#');
    }

    #[test]
    fn test_draw_text_clips() {
        let mut buffer = FieldBuffer::new(10, 2, 100.0, 20.0);
        buffer.draw_text(7, 1, "abcdef", Color::White);
        assert_eq!(buffer.row_text(1), "       abc");
        buffer.draw_text(0, 5, "ignored", Color::White);
    }

    #[test]
    fn test_render_every_state() {
        let assets = Assets::placeholders();
        let mut session = session();
        for state in [
            GameState::ShowingInstructions,
            GameState::Playing,
            GameState::GameOver,
        ] {
            session.state = state;
            let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
            terminal
                .draw(|frame| {
                    let area = frame.size();
                    render_race_scene(frame, area, &session, &assets);
                })
                .unwrap();
        }
    }

    #[test]
    fn test_render_tiny_terminal() {
        let assets = Assets::placeholders();
        let session = session();
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_race_scene(frame, area, &session, &assets);
            })
            .unwrap();
    }
}
