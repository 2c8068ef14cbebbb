use std::io;

use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::app::{App, Mode};
use crate::panel::SortColumn;

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(app.tick_timeout())? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
        app.on_tick();
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(f.area());

    draw_table(f, app, chunks[0]);
    draw_footer(f, app, chunks[1]);

    match &app.mode {
        Mode::Normal => {}
        Mode::AddDescription { .. } | Mode::AddDueDate { .. } => {
            if let Some((title, input)) = app.prompt() {
                draw_popup(
                    f,
                    &title,
                    Line::from(vec![
                        Span::raw(input),
                        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                    ]),
                    Color::Cyan,
                );
            }
        }
        Mode::ConfirmDelete => draw_popup(
            f,
            "Confirm Delete",
            Line::from("Are you sure you want to delete the selected task? (y/n)"),
            Color::Yellow,
        ),
        Mode::Error(message) => draw_popup(f, "Error", Line::from(message.as_str()), Color::Red),
    }
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let panel = &app.panel;

    let header_cells = SortColumn::ALL.iter().enumerate().map(|(i, column)| {
        let marker = match panel.sort() {
            Some((sorted, false)) if sorted == *column => " ▲",
            Some((sorted, true)) if sorted == *column => " ▼",
            _ => "",
        };
        Cell::from(format!("{}:{}{}", i + 1, column.title(), marker))
            .style(Style::default().add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .height(1);

    let rows = panel.rows().iter().map(|row| {
        let style = if row.is_overdue() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(vec![
            Cell::from(row.description.as_str()),
            Cell::from(row.due_date_text()),
            Cell::from(row.countdown.text.as_str()),
            Cell::from(row.countdown.remaining_seconds.to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Min(20),
        Constraint::Length(21),
        Constraint::Length(18),
        Constraint::Length(22),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Tasks ({})", panel.rows().len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
        .highlight_symbol(">> ");

    let mut state = TableState::default().with_selected(panel.selected());
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = "a add | d delete | 1-4 sort | ↑↓ select | r refresh | q quit";
    let mut spans = vec![Span::styled(help, Style::default().fg(Color::DarkGray))];
    if !app.status.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            app.status.as_str(),
            Style::default().fg(Color::Green),
        ));
    }
    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.panel.store().path().display().to_string()),
    );
    f.render_widget(footer, area);
}

fn draw_popup(f: &mut Frame, title: &str, body: Line, color: Color) {
    let area = centered_rect(60, 5, f.area());
    let popup = Paragraph::new(body)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
