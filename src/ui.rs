use lingo::evaluate::LetterScore;
use lingo::session::{Attempt, Phase, MAX_ATTEMPTS};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.phase() {
            Phase::Finished { won } => render_results(self, won, area, buf),
            Phase::NotStarted => {}
            _ if self.session.is_paused() => render_paused(area, buf),
            _ => render_board(self, area, buf),
        }
    }
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let word_len = session.current_word().map_or(5, str::len);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),                       // header
                Constraint::Length(MAX_ATTEMPTS as u16 + 1), // board
                Constraint::Length(1),                       // input
                Constraint::Length(1),                       // status
                Constraint::Length(1),                       // timer gauge
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let hints = if app.hints_enabled {
        format!("hints {}", session.hints_remaining())
    } else {
        "hints off".to_string()
    };
    let header = format!(
        "round {}/5   score {}   {}   {}s left",
        session.round_number(),
        session.score(),
        hints,
        session.remaining_seconds(),
    );
    Paragraph::new(Span::styled(header, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let mut lines: Vec<Line> = session
        .attempts()
        .iter()
        .map(|attempt| attempt_line(attempt))
        .collect();
    if session.phase() == Phase::Playing {
        lines.push(current_row_line(app, word_len));
    }
    for _ in lines.len()..MAX_ATTEMPTS {
        lines.push(empty_row_line(word_len));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let input_line = if app.checking {
        Line::from(Span::styled("checking the dictionary...", dim_style))
    } else {
        Line::from(vec![
            Span::styled("guess: ", dim_style),
            Span::styled(app.input.to_uppercase(), bold_style),
        ])
    };
    Paragraph::new(input_line)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(status) = &app.status {
        let mut paragraph = Paragraph::new(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center);
        if status.width() as u16 > chunks[3].width {
            paragraph = paragraph.wrap(Wrap { trim: true });
        }
        paragraph.render(chunks[3], buf);
    }

    // elapsed fraction of the attempt clock, purely cosmetic
    let gauge_area = centered(chunks[4], 40);
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(app.session.timer_progress())
        .label("")
        .render(gauge_area, buf);
}

fn attempt_line(attempt: &Attempt) -> Line<'static> {
    let spans = attempt
        .word
        .chars()
        .zip(attempt.feedback.iter())
        .flat_map(|(ch, &score)| {
            let cell = format!(" {} ", ch.to_ascii_uppercase());
            let style = match score {
                LetterScore::Correct => Style::default().bg(Color::Green).fg(Color::Black),
                LetterScore::Present => Style::default().bg(Color::Yellow).fg(Color::Black),
                LetterScore::Absent => Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            };
            [Span::styled(cell, style), Span::raw(" ")]
        })
        .collect::<Vec<Span>>();
    Line::from(spans)
}

fn current_row_line(app: &App, word_len: usize) -> Line<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let hint_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let template = app.session.attempt_template();
    let typed: Vec<char> = app.input.chars().collect();

    let spans = (0..word_len)
        .flat_map(|i| {
            let span = if let Some(&ch) = typed.get(i) {
                Span::styled(format!(" {} ", ch.to_ascii_uppercase()), bold_style)
            } else if let Some(Some(ch)) = template.get(i) {
                Span::styled(format!(" {} ", ch.to_ascii_uppercase()), hint_style)
            } else {
                Span::styled(" · ".to_string(), dim_style)
            };
            [span, Span::raw(" ")]
        })
        .collect::<Vec<Span>>();
    Line::from(spans)
}

fn empty_row_line(word_len: usize) -> Line<'static> {
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let spans = (0..word_len)
        .flat_map(|_| [Span::styled(" · ".to_string(), dim_style), Span::raw(" ")])
        .collect::<Vec<Span>>();
    Line::from(spans)
}

fn render_paused(area: Rect, buf: &mut Buffer) {
    let message = Paragraph::new(Span::styled(
        "PAUSED - press space to resume",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    message.render(centered_vertically(area), buf);
}

fn render_results(app: &App, won: bool, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let outcome = if won {
        Span::styled("You won!", Style::default().patch(bold_style).fg(Color::Green))
    } else {
        Span::styled("Game over", Style::default().patch(bold_style).fg(Color::Red))
    };
    let score = format!("final score: {}", session.score());
    let rounds = format!("{}/5 rounds won", session.rounds_won());
    let best = app
        .best_score
        .map(|b| format!("best at this difficulty: {b}"))
        .unwrap_or_default();

    let lines = vec![
        Line::from(outcome),
        Line::from(""),
        Line::from(Span::styled(score, bold_style)),
        Line::from(Span::styled(rounds, dim_style)),
        Line::from(Span::styled(best, dim_style)),
        Line::from(""),
        Line::from(Span::styled(
            "(r)etry / (t)weet / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_vertically(area), buf);
}

fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        width,
        ..area
    }
}

fn centered_vertically(area: Rect) -> Rect {
    let height = area.height.min(8);
    Rect {
        y: area.y + (area.height.saturating_sub(height)) / 2,
        height,
        ..area
    }
}
