use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

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
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use cartola_terminal::export;
use cartola_terminal::fake_feed;
use cartola_terminal::feed;
use cartola_terminal::roster::PlayerRecord;
use cartola_terminal::state::{
    self, AppState, BUDGET_STEP, Screen, apply_delta, screen_label, sort_label,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Market,
            KeyCode::Char('2') => self.state.screen = Screen::Lineup,
            KeyCode::Char('3') => self.state.screen = Screen::Matchups,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => self.state.cycle_sort(),
            KeyCode::Char('g') | KeyCode::Enter => self.state.generate_lineup(),
            KeyCode::Char('c') => self.state.toggle_criterion(),
            KeyCode::Char('t') => self.state.toggle_ceiling(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_budget(BUDGET_STEP),
            KeyCode::Char('-') => self.state.adjust_budget(-BUDGET_STEP),
            KeyCode::Char(']') => self.state.adjust_min_games(1),
            KeyCode::Char('[') => self.state.adjust_min_games(-1),
            KeyCode::Char('r') => self.request(state::ProviderCommand::RefreshMarket),
            KeyCode::Char('f') => self.request(state::ProviderCommand::RefreshFixtures),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request(&mut self, cmd: state::ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Provider unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
        } else {
            self.state.push_log("[INFO] Refresh request sent");
        }
    }

    fn export_csv(&mut self) {
        let rows: Vec<PlayerRecord> = self.state.listing().into_iter().cloned().collect();
        let path = export::default_export_path();
        match export::export_market_csv(&path, &rows) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} rows to {}",
                report.rows,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export error: {err}")),
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
    let source = std::env::var("MARKET_SOURCE").unwrap_or_else(|_| "live".to_string());
    if source.eq_ignore_ascii_case("sample") {
        fake_feed::spawn_sample_provider(tx, cmd_rx);
    } else {
        feed::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(Some(cmd_tx));
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
    rx: mpsc::Receiver<state::Delta>,
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
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Market => render_market(frame, chunks[1], &app.state),
        Screen::Lineup => render_lineup(frame, chunks[1], &app.state),
        Screen::Matchups => render_matchups(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let ceiling = match state.ceiling_multiplier {
        Some(mult) => format!("x{mult:.1}"),
        None => "off".to_string(),
    };
    let line1 = format!(
        "  .-.  CARTOLA {} | Sort: {} | Criterion: {}",
        screen_label(state.screen),
        sort_label(state.sort),
        state.criterion.label()
    );
    let line2 = format!(
        " /___\\ Budget: C$ {:.2} | Min games: {} | Ceiling: {}",
        state.budget, state.min_games, ceiling
    );
    let line3 = format!("  |_|  Players: {}", state.records.len());
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Market => {
            "1/2/3 Screens | j/k Move | s Sort | [/] Min games | g Lineup | e Export | r/f Refresh | ? Help | q Quit"
                .to_string()
        }
        Screen::Lineup => {
            "1/2/3 Screens | g Generate | c Criterion | t Ceiling | +/- Budget | [/] Min games | ? Help | q Quit"
                .to_string()
        }
        Screen::Matchups => "1/2/3 Screens | f Refresh fixtures | ? Help | q Quit".to_string(),
    }
}

fn render_market(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = market_columns();
    render_market_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let listing = state.listing();
    if listing.is_empty() {
        let empty = Paragraph::new("No market data yet (market may be closed)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, listing.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
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

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let p = listing[idx];
        render_cell_text(frame, cols[0], &p.nickname, row_style);
        render_cell_text(frame, cols[1], p.position.label(), row_style);
        render_cell_text(frame, cols[2], &p.club, row_style);
        render_cell_text(frame, cols[3], p.status.label(), status_style(p, row_style));
        render_cell_text(frame, cols[4], &format!("{:.2}", p.average_score), row_style);
        render_cell_text(frame, cols[5], &format!("{:.2}", p.price), row_style);
        render_cell_text(frame, cols[6], &format!("{:.2}", p.efficiency), row_style);
        render_cell_text(frame, cols[7], &p.games_played.to_string(), row_style);
    }
}

fn status_style(p: &PlayerRecord, base: Style) -> Style {
    use cartola_terminal::roster::Status;
    match p.status {
        Status::Likely => base.fg(Color::Green),
        Status::Doubtful => base.fg(Color::Yellow),
        Status::Injured | Status::Suspended => base.fg(Color::Red),
        Status::Void | Status::Unknown => base.fg(Color::DarkGray),
    }
}

fn market_columns() -> [Constraint; 8] {
    [
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(6),
    ]
}

fn render_market_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Player", style);
    render_cell_text(frame, cols[1], "Pos", style);
    render_cell_text(frame, cols[2], "Club", style);
    render_cell_text(frame, cols[3], "Status", style);
    render_cell_text(frame, cols[4], "Avg", style);
    render_cell_text(frame, cols[5], "Price", style);
    render_cell_text(frame, cols[6], "Eff", style);
    render_cell_text(frame, cols[7], "Games", style);
}

fn render_lineup(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(area);

    let verdict = Paragraph::new(verdict_text(state))
        .block(Block::default().title("Budget").borders(Borders::ALL));
    frame.render_widget(verdict, columns[0]);

    let table = Paragraph::new(lineup_text(state))
        .block(Block::default().title("Suggested XI").borders(Borders::ALL));
    frame.render_widget(table, columns[1]);
}

fn verdict_text(state: &AppState) -> String {
    let Some(lineup) = &state.lineup else {
        return "No lineup yet\n\nPress g to generate".to_string();
    };
    let status = if lineup.feasible {
        "WITHIN BUDGET".to_string()
    } else {
        format!("OVER by C$ {:.2}", lineup.overshoot)
    };
    format!(
        "Cost: C$ {:.2}\nBudget: C$ {:.2}\n{}\nPlayers: {}",
        lineup.total_cost,
        lineup.budget,
        status,
        lineup.players.len()
    )
}

fn lineup_text(state: &AppState) -> String {
    let Some(lineup) = &state.lineup else {
        return "Press g to generate a lineup from Likely players".to_string();
    };
    if lineup.players.is_empty() {
        return "No eligible candidates in the pool".to_string();
    }
    lineup
        .players
        .iter()
        .map(|p| {
            format!(
                "{:<12} {:<16} {:<14} avg {:>5.2}  C$ {:>6.2}",
                p.position.label(),
                p.nickname,
                p.club,
                p.average_score,
                p.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_matchups(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(area);

    let weak = Paragraph::new(weakness_text(state))
        .block(Block::default().title("Weak Defenses").borders(Borders::ALL));
    frame.render_widget(weak, columns[0]);

    let title = match state.round {
        Some(round) => format!("Favorable Matchups (round {round})"),
        None => "Favorable Matchups".to_string(),
    };
    let notes = Paragraph::new(notes_text(state))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(notes, columns[1]);
}

fn weakness_text(state: &AppState) -> String {
    if state.weakness.is_empty() {
        return "No market data yet".to_string();
    }
    state
        .weakness
        .iter()
        .map(|w| {
            format!(
                "{:<16} mean {:>5.2}  ({} players)",
                w.club, w.mean_score, w.players
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn notes_text(state: &AppState) -> String {
    if state.fixtures.is_empty() {
        return "No fixtures yet (press f to refresh)".to_string();
    }
    if state.notes.is_empty() {
        return "No favorable matchups this round".to_string();
    }
    state
        .notes
        .iter()
        .map(|n| format!("{} attacks the weak defense of {}", n.attacker, n.weak_defense))
        .collect::<Vec<_>>()
        .join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
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
        "Cartola Terminal - Help",
        "",
        "Global:",
        "  1            Market table",
        "  2            Lineup suggestion",
        "  3            Matchup analysis",
        "  r / f        Refresh market / fixtures",
        "  e            Export market CSV",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Market:",
        "  j/k or ↑/↓   Move",
        "  s            Cycle sort column",
        "  [ / ]        Min games filter",
        "",
        "Lineup:",
        "  g / Enter    Generate lineup",
        "  c            Criterion (AVG/EFF)",
        "  t            Slot price ceiling on/off",
        "  + / -        Budget",
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
