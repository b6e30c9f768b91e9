use crate::client::AppSnapshot;
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

pub type InputEventReceiver = mpsc::UnboundedReceiver<std::io::Result<Event>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    StartDraw,
    NextDigit,
    ReloadPool,
    Redraw,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Reads terminal events on a dedicated thread so the frame ticker never
/// waits on the keyboard.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            let ev = event::read();
            let failed = ev.is_err();
            if tx.send(ev).is_err() || failed {
                break;
            }
        }
    });
    rx
}

pub async fn next_raw_event(input_events: &mut InputEventReceiver) -> Result<Event> {
    match input_events.recv().await {
        Some(ev) => Ok(ev?),
        None => Err(eyre!("terminal input closed")),
    }
}

pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    let Event::Key(k) = event else {
        return matches!(event, Event::Resize(..)).then_some(UserEvent::Redraw);
    };
    if k.kind != KeyEventKind::Press {
        return None;
    }
    if state.mode == Mode::QuitModal {
        return match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }
    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.mode = Mode::QuitModal;
            Some(UserEvent::Redraw)
        }
        KeyCode::Char('s') | KeyCode::Enter => Some(UserEvent::StartDraw),
        KeyCode::Char('n') => Some(UserEvent::NextDigit),
        KeyCode::Char('r') => Some(UserEvent::ReloadPool),
        _ => None,
    }
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Length(7), // reels
            Constraint::Min(6),    // winners + log
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_top(f, chunks[0], snap);
    draw_reels(f, chunks[1], snap);
    draw_lower(f, chunks[2], snap);
    draw_help(f, chunks[3]);
    if state.mode == Mode::QuitModal {
        let area = centered_rect(40, 20, f.area());
        let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
        let p = Paragraph::new("Quit the draw? (Y/N)");
        f.render_widget(Clear, area);
        f.render_widget(block.clone(), area);
        f.render_widget(p, block.inner(area));
    }
}

fn draw_top(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let status = if snap.is_running { "drawing" } else { "idle" };
    let decided: String = snap.decided.iter().rev().collect();
    let text = format!(
        "Pool: {} | Active: {} | Matching: {} | Decided: {} | Seed: {} | {}",
        snap.pool_size,
        snap.active_count,
        snap.matching_count,
        if decided.is_empty() { "-" } else { &decided },
        snap.seed_digest,
        status,
    );
    let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}

fn draw_reels(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let block = Block::default().borders(Borders::ALL).title("Reels");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if snap.reels.is_empty() {
        return;
    }

    let reel_width = snap
        .reels
        .iter()
        .flat_map(|reel| reel.rows.iter())
        .map(|row| row.width())
        .max()
        .unwrap_or(1) as u16
        + 4;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .flex(Flex::Center)
        .constraints(snap.reels.iter().map(|_| Constraint::Length(reel_width)))
        .split(inner);

    for (reel, column) in snap.reels.iter().zip(columns.iter()) {
        let middle = reel.rows.len() / 2;
        let lines: Vec<Line> = reel
            .rows
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                let style = match (i == middle, reel.stopped) {
                    (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    (true, false) => Style::default().add_modifier(Modifier::BOLD),
                    _ => Style::default().fg(Color::DarkGray),
                };
                Line::styled(symbol.clone(), style)
            })
            .collect();
        let p = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, *column);
    }
}

fn draw_lower(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let number_width = snap
        .winners
        .iter()
        .map(|w| w.entry.number().width())
        .max()
        .unwrap_or(0);
    let winners: Vec<Line> = snap
        .winners
        .iter()
        .enumerate()
        .rev()
        .map(|(i, w)| {
            Line::from(format!(
                "{:>3}. {} {:<number_width$} {}",
                i + 1,
                w.drawn_at.format("%H:%M:%S"),
                w.entry.number(),
                w.entry.display_name(),
            ))
        })
        .collect();
    let title = match &snap.target {
        Some(t) if snap.is_running => format!("Winners (drawing {} reels)", t.width()),
        _ => "Winners".to_string(),
    };
    let p = Paragraph::new(winners).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, cols[0]);

    let visible = cols[1].height.saturating_sub(2) as usize;
    let start = snap.messages.len().saturating_sub(visible);
    let log: Vec<Line> = snap.messages[start..]
        .iter()
        .map(|m| Line::from(m.as_str()))
        .collect();
    let p = Paragraph::new(log).block(Block::default().borders(Borders::ALL).title("Log"));
    f.render_widget(p, cols[1]);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("s/Enter draw | n stop next reel | r reload pool | q/Esc quit")
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1])[1]
}
