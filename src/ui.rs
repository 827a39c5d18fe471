pub mod board;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{app::App, mode::Mode};
use board::{board_lines, DIGITS_PER_LINE, MAX_LINES_DISPLAYED};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const CORRECT_COLOR: Color = Color::Green;
const DONE_COLOR: Color = Color::DarkGray;
const CURSOR_COLOR: Color = Color::Blue;
const ERROR_COLOR: Color = Color::Red;

pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    screen::current_screen(&app.state).render(app, area, f.buffer_mut());
}

/// `MM:SS` for timed modes, `∞` otherwise
pub fn format_clock(secs: Option<u32>) -> String {
    match secs {
        Some(s) => format!("{:02}:{:02}", s / 60, s % 60),
        None => "∞".to_string(),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn centered_rows(area: Rect, heights: &[u16]) -> Vec<Rect> {
    let content: u16 = heights.iter().sum();
    let pad = area
        .height
        .saturating_sub(content + VERTICAL_MARGIN * 2)
        / 2;

    let mut constraints = vec![Constraint::Length(pad)];
    constraints.extend(heights.iter().map(|h| Constraint::Length(*h)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(constraints)
        .split(area);
    chunks[1..=heights.len()].to_vec()
}

pub fn render_landing(app: &App, area: Rect, buf: &mut Buffer) {
    let rows = centered_rows(area, &[2, 2, 1, 1, 1, 2, 1]);

    Paragraph::new(Span::styled(
        "πQ",
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(rows[0], buf);

    Paragraph::new(Span::styled(
        "how many digits of pi can you recall?",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(rows[1], buf);

    for (i, mode) in Mode::ALL.into_iter().enumerate() {
        let selected = mode == app.selected;
        let style = if selected {
            bold().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(if selected { "> " } else { "  " }, style),
            Span::styled(format!("{} {:<10}", i + 1, mode.to_string()), style),
            Span::styled(
                format!("{:<32}", mode.tagline()),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::styled(format!("best {}", app.game.high_score(mode)), style),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(rows[2 + i], buf);
    }

    legend("(1/2/3) play / (↑/↓) select / (enter) start / (esc)ape").render(rows[6], buf);
}

pub fn render_countdown(app: &App, remaining: u8, area: Rect, buf: &mut Buffer) {
    let rows = centered_rows(area, &[2, 1]);

    Paragraph::new(Span::styled(
        app.selected.to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(rows[0], buf);

    Paragraph::new(Span::styled(
        remaining.to_string(),
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(rows[1], buf);
}

fn stats_line(app: &App) -> Line<'static> {
    let session = app.game.session();
    let mut spans = vec![
        Span::styled(format!("Score: {}", session.score()), bold()),
        Span::raw("   "),
        Span::styled(format!("Combo: {}", session.combo()), bold().fg(Color::Magenta)),
        Span::raw("   "),
        Span::styled(
            format!("Time: {}", format_clock(session.time_remaining())),
            bold(),
        ),
    ];
    if let Some(budget) = session.policy().mistake_budget {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("Mistakes: {}/{}", session.mistakes(), budget),
            bold().fg(ERROR_COLOR),
        ));
    }
    Line::from(spans)
}

fn board_line(symbols: &str, completed: bool, has_cursor: bool) -> Line<'static> {
    let mut spans: Vec<Span> = symbols
        .chars()
        .map(|c| {
            let style = match (c, completed) {
                ('.', _) => bold().fg(Color::White),
                (_, true) => Style::default().fg(DONE_COLOR),
                (_, false) => bold().fg(CORRECT_COLOR),
            };
            Span::styled(format!("{c} "), style)
        })
        .collect();
    if has_cursor {
        spans.push(Span::styled(
            "_",
            bold().fg(CURSOR_COLOR).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

pub fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let board_height = MAX_LINES_DISPLAYED as u16 + 2;
    let rows = centered_rows(area, &[2, board_height, 1, 1]);

    Paragraph::new(stats_line(app))
        .alignment(Alignment::Center)
        .render(rows[0], buf);

    let lines: Vec<Line> = board_lines(
        app.game.session().entered(),
        DIGITS_PER_LINE,
        MAX_LINES_DISPLAYED,
    )
    .into_iter()
    .map(|l| board_line(l.symbols, l.completed, l.has_cursor))
    .collect();

    let border_style = if app.feedback.is_error() {
        Style::default().fg(ERROR_COLOR)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        )
        .alignment(Alignment::Left)
        .render(rows[1], buf);

    legend("(esc) give up").render(rows[3], buf);
}

pub fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let rows = centered_rows(area, &[2, 1, 1, 2, 1]);

    let Some(result) = app.game.result() else {
        legend("(enter) play again / (m)enu").render(rows[4], buf);
        return;
    };

    Paragraph::new(Span::styled(
        result.reason.message(),
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(rows[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} score: {}   best combo: {}",
            result.mode, result.score, result.best_combo
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(rows[1], buf);

    let best = if result.new_best {
        Span::styled("New high score!", bold().fg(Color::Yellow))
    } else {
        Span::styled(
            format!("High score: {}", result.previous_best),
            Style::default().add_modifier(Modifier::DIM),
        )
    };
    Paragraph::new(best)
        .alignment(Alignment::Center)
        .render(rows[2], buf);

    legend("(r)etry / (m)enu / (q)uit").render(rows[4], buf);
}
