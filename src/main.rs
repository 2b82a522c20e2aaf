use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use betagent_terminal::export;
use betagent_terminal::provider;
use betagent_terminal::state::{
    AppState, Delta, Outcome, PredictionBundle, ProviderCommand, UpcomingMatch, apply_delta,
};
use betagent_terminal::view_model::{self, ConfidenceTier};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') | KeyCode::Enter => self.request_analysis(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_matches_refresh(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.request_summary_refresh(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_workbook(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_analysis(&mut self) {
        let Some(match_id) = self.state.selected_match_id() else {
            self.state.push_log("[INFO] No match selected");
            return;
        };
        // The affordance is disabled while this match's request is in flight.
        if self.state.is_in_flight(&match_id) {
            self.state
                .push_log(format!("[INFO] Analysis already running for {match_id}"));
            return;
        }
        if self
            .cmd_tx
            .send(ProviderCommand::Analyze { match_id })
            .is_err()
        {
            self.state.push_log("[WARN] Analysis request failed");
        }
    }

    fn request_matches_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::RefreshMatches).is_err() {
            self.state.push_log("[WARN] Match refresh request failed");
        }
    }

    fn request_summary_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::RefreshSummary).is_err() {
            self.state.push_log("[WARN] Summary refresh request failed");
        }
    }

    fn export_workbook(&mut self) {
        let path = std::path::PathBuf::from(format!(
            "betagent_{}.xlsx",
            Utc::now().format("%Y%m%d_%H%M%S")
        ));
        match export::export_dashboard(&path, &self.state) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} predictions / {} matches to {}",
                report.predictions,
                report.matches,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_summary_tiles(frame, chunks[1], &app.state);
    render_body(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let status = if state.summary_loaded {
        "SYSTEM ONLINE"
    } else {
        "CONNECTING..."
    };
    format!(
        "BETAGENT TERMINAL | Autonomous Betting Agent\nAnalysis ecosystem v1.0\n{status}"
    )
}

fn footer_text() -> &'static str {
    "Enter/a Analyze | j/k/↑/↓ Move | r Matches | s Summary | e Export | ? Help | q Quit"
}

fn render_summary_tiles(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let golden = state
        .summary
        .golden_algorithm
        .clone()
        .unwrap_or_else(|| "Initializing...".to_string());
    let accuracy = state
        .summary
        .system_accuracy
        .clone()
        .unwrap_or_else(|| "--%".to_string());

    render_tile(frame, cols[0], "Golden Algorithm", &golden, "best performing");
    render_tile(frame, cols[1], "Accuracy", &accuracy, "recent backtest");
    render_tile(
        frame,
        cols[2],
        "Data Points",
        &state.summary.data_points.to_string(),
        "matches analyzed",
    );
    render_tile(
        frame,
        cols[3],
        "Active Agents",
        &state.summary.algorithms_tested.to_string(),
        "algorithms competing",
    );
}

fn render_tile(frame: &mut Frame, area: Rect, title: &str, value: &str, hint: &str) {
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let tile = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(tile, area);
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(area);

    render_match_list(frame, cols[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(9)])
        .split(cols[1]);

    render_prediction_card(frame, right[0], state);
    render_console(frame, right[1], state);
}

fn render_match_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Live Analysis").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.matches.is_empty() {
        let empty = Paragraph::new("No matches scheduled")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    const ROW_HEIGHT: u16 = 3;
    if inner.height < ROW_HEIGHT {
        return;
    }

    let visible = (inner.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, state.matches.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + (i as u16) * ROW_HEIGHT,
            width: inner.width,
            height: ROW_HEIGHT,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let m = &state.matches[idx];
        let prefix = if selected { "> " } else { "  " };
        let title = format!("{prefix}{} vs {}", m.home, m.away);
        let date = format!("  {}{}", m.date, league_suffix(m));
        let status = format!("  {}", prediction_line(state, &m.id));

        let lines = vec![
            Line::from(Span::styled(
                title,
                row_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(date, row_style.fg(Color::DarkGray))),
            Line::from(Span::styled(status, status_style(state, &m.id, row_style))),
        ];
        frame.render_widget(Paragraph::new(lines), row_area);
    }
}

fn league_suffix(m: &UpcomingMatch) -> String {
    match &m.league {
        Some(league) => format!(" | {league}"),
        None => String::new(),
    }
}

fn prediction_line(state: &AppState, match_id: &str) -> String {
    if state.is_in_flight(match_id) {
        return "analyzing...".to_string();
    }
    match state.prediction_for(match_id) {
        Some(bundle) => {
            let view = view_model::present(bundle);
            format!(
                "{} {} ({}) | {}",
                view.outcome_label,
                view_model::format_confidence(bundle.golden.confidence),
                view.confidence_tier.label(),
                bundle.golden.name
            )
        }
        None => "pending | press a to analyze".to_string(),
    }
}

fn status_style(state: &AppState, match_id: &str, base: Style) -> Style {
    if state.is_in_flight(match_id) {
        return base.fg(Color::Yellow);
    }
    match state.prediction_for(match_id) {
        Some(bundle) => match view_model::confidence_tier(bundle.golden.confidence) {
            ConfidenceTier::High => base.fg(Color::Green),
            ConfidenceTier::Low => base.fg(Color::Yellow),
        },
        None => base.fg(Color::DarkGray),
    }
}

fn render_prediction_card(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Match Analysis").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let Some(m) = state.selected_match() else {
        frame.render_widget(Paragraph::new("No match selected"), inner);
        return;
    };

    let Some(bundle) = state.prediction_for(&m.id) else {
        let text = if state.is_in_flight(&m.id) {
            format!("{} vs {}\n\nAnalyzing...", m.home, m.away)
        } else {
            format!("{} vs {}\n\nNot analyzed yet (press a)", m.home, m.away)
        };
        frame.render_widget(Paragraph::new(text), inner);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(4), Constraint::Min(1)])
        .split(inner);

    let view = view_model::present(bundle);
    let tier_style = match view.confidence_tier {
        ConfidenceTier::High => Style::default().fg(Color::Green),
        ConfidenceTier::Low => Style::default().fg(Color::Yellow),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} vs {}", m.home, m.away),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.outcome_label.to_string(),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!(
                "{} confidence ({})",
                view_model::format_confidence(bundle.golden.confidence),
                view.confidence_tier.label()
            ),
            tier_style,
        )),
        Line::from(Span::styled(
            format!("Based on {}", bundle.golden.name),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];
    for vote in &view.top_votes {
        lines.push(Line::from(Span::styled(
            view_model::format_vote(vote),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), sections[0]);

    frame.render_widget(vote_bar_chart(bundle), sections[1]);

    let rationale = Paragraph::new(bundle.golden.rationale.clone())
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Reasoning").borders(Borders::TOP));
    frame.render_widget(rationale, sections[2]);
}

/// Vote distribution across the whole ensemble, golden vote included.
fn vote_bar_chart(bundle: &PredictionBundle) -> BarChart<'static> {
    let mut counts = [0u64; 3];
    let tally = |outcome: Outcome, counts: &mut [u64; 3]| match outcome {
        Outcome::Home => counts[0] += 1,
        Outcome::Draw => counts[1] += 1,
        Outcome::Away => counts[2] += 1,
    };
    tally(bundle.golden.outcome, &mut counts);
    for vote in &bundle.votes {
        tally(vote.outcome, &mut counts);
    }

    let home = Bar::default()
        .value(counts[0])
        .label("1".into())
        .style(Style::default().fg(Color::Green));
    let draw = Bar::default()
        .value(counts[1])
        .label("X".into())
        .style(Style::default().fg(Color::Yellow));
    let away = Bar::default()
        .value(counts[2])
        .label("2".into())
        .style(Style::default().fg(Color::Red));

    BarChart::default()
        .data(BarGroup::default().bars(&[home, draw, away]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("System Logs").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.logs.is_empty() {
        frame.render_widget(
            Paragraph::new("No activity yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let take = inner.height as usize;
    let text = state
        .logs
        .iter()
        .rev()
        .take(take)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n");
    frame.render_widget(Paragraph::new(text), inner);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Betagent Terminal - Help",
        "",
        "  Enter / a    Analyze selected match",
        "  j/k or ↑/↓   Move selection",
        "  r            Refresh match directory",
        "  s            Refresh dashboard summary",
        "  e            Export workbook (.xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "The first match is analyzed automatically",
        "when the directory loads.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
