//! Stateless UI rendering for the Gomoku board.

use super::app::App;
use crate::games::gomoku::{BOARD_SIZE, Cell, Coordinates, Player};
use crate::orchestrator::GameSnapshot;
use crate::view::status_message;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CELL_WIDTH: u16 = 3;
const LABEL_WIDTH: u16 = 3;

/// Renders one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let snapshot = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                         // Title
            Constraint::Min(BOARD_SIZE as u16 + 3),        // Board
            Constraint::Length(4),                         // Status
        ])
        .split(frame.area());

    let title = Paragraph::new(format!("Strictly Gomoku - You (Black) vs {} (White)", app.opponent_name()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], &snapshot, app.cursor());
    draw_status(frame, chunks[2], &snapshot, app.hint());
}

fn draw_board(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, cursor: Coordinates) {
    let width = LABEL_WIDTH + BOARD_SIZE as u16 * CELL_WIDTH + 2;
    let height = BOARD_SIZE as u16 + 3;
    let board_area = center_rect(area, width, height);

    let header: String = (0..BOARD_SIZE).map(|col| format!("{:>3}", col)).collect();
    let mut lines = vec![Line::from(Span::styled(
        format!("{:>width$}{}", "", header, width = LABEL_WIDTH as usize),
        Style::default().fg(Color::DarkGray),
    ))];

    for row in 0..BOARD_SIZE {
        let mut spans = vec![Span::styled(
            format!("{:>2} ", row),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend((0..BOARD_SIZE).map(|col| cell_span(snapshot, Coordinates::new(row, col), cursor)));
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, board_area);
}

fn cell_span(snapshot: &GameSnapshot, at: Coordinates, cursor: Coordinates) -> Span<'static> {
    let (symbol, mut style) = match snapshot.board().get(at) {
        Some(Cell::Occupied(Player::Human)) => (" ● ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Some(Cell::Occupied(Player::Agent)) => (" ○ ", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)),
        _ => (" · ", Style::default().fg(Color::DarkGray)),
    };

    if snapshot.winning_line().is_some_and(|line| line.contains(&at)) {
        style = style.bg(Color::Green);
    } else if snapshot.last_move() == Some(at) {
        style = style.bg(Color::Blue);
    }
    if at == cursor && snapshot.is_active() {
        style = style.bg(Color::Yellow).fg(Color::Black);
    }

    Span::styled(symbol, style)
}

fn draw_status(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, hint: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        status_message(snapshot),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];

    let help = match hint {
        Some(hint) => Span::styled(hint.to_string(), Style::default().fg(Color::Red)),
        None if snapshot.is_active() => Span::raw("Arrows/hjkl move, Enter/Space place, r restart, q quit"),
        None => Span::raw("Press 'r' to play again or 'q' to quit"),
    };
    lines.push(Line::from(help));

    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
