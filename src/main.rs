mod app;
mod config;
mod event;
mod prompt;
mod session;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use app::{App, AppScreen, pick_index_from_key, quick_pick_hint};
use config::{AppConfig, parse_duration};
use event::{AppEvent, EventHandler};
use prompt::Mode;
use ui::components::menu::SelectMenu;
use ui::components::typing_area::TypingArea;
use ui::layout::centered_rect;

const SPLASH_ART: [&str; 6] = [
    r" _              __ _                ",
    r"| | _____ _   _ / _| | _____      __",
    r"| |/ / _ \ | | | |_| |/ _ \ \ /\ / /",
    r"|   <  __/ |_| |  _| | (_) \ V  V / ",
    r"|_|\_\___|\__, |_| |_|\___/ \_/\_/  ",
    r"          |___/                     ",
];

#[derive(Parser)]
#[command(
    name = "keyflow",
    version,
    about = "Terminal typing trainer with remote quote and code prompts"
)]
struct Cli {
    #[arg(short, long, help = "Path to JSON config file")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Start directly in a mode (normal, special, quote, code)")]
    mode: Option<String>,

    #[arg(short, long, help = "Session duration, e.g. 30s or 1m")]
    duration: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref())?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(cfg, events.sender());

    if let Some(mode) = cli.mode.as_deref() {
        let Some(idx) = Mode::ALL.iter().position(|m| m.as_str() == mode) else {
            bail!("unknown mode {mode:?} (expected normal, special, quote or code)");
        };
        app.mode_selected = idx;
    }
    if let Some(raw) = cli.duration.as_deref() {
        let wanted = parse_duration(raw)?;
        let Some(idx) = app.cfg.duration_options.iter().position(|d| *d == wanted) else {
            bail!(
                "duration {raw:?} is not one of the configured options ({})",
                app.cfg.duration_labels.join(", ")
            );
        };
        app.duration_selected = idx;
    }
    if cli.mode.is_some() && cli.duration.is_some() {
        app.start_session();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::PromptReady { mode, seq, outcome } => {
                app.on_prompt_ready(mode, seq, outcome);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Splash => handle_splash_key(app, key),
        AppScreen::ModeSelect => handle_mode_key(app, key),
        AppScreen::DurationSelect => handle_duration_key(app, key),
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Done => handle_done_key(app, key),
    }
}

fn handle_splash_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.screen = AppScreen::ModeSelect,
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_mode_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Up => app.mode_prev(),
        KeyCode::Right | KeyCode::Down => app.mode_next(),
        KeyCode::Enter => app.screen = AppScreen::DurationSelect,
        KeyCode::Char(ch) => {
            if let Some(idx) = pick_index_from_key(ch, Mode::ALL.len()) {
                app.mode_selected = idx;
            }
        }
        _ => {}
    }
}

fn handle_duration_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.screen = AppScreen::ModeSelect,
        KeyCode::Left | KeyCode::Up => app.duration_prev(),
        KeyCode::Right | KeyCode::Down => app.duration_next(),
        KeyCode::Enter => app.start_session(),
        KeyCode::Char(ch) => {
            if let Some(idx) = pick_index_from_key(ch, app.duration_items.len()) {
                app.duration_selected = idx;
            }
        }
        _ => {}
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abort_session(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_done_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.session = None;
            app.screen = AppScreen::ModeSelect;
        }
        KeyCode::Char('r') => app.start_session(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    if area.width < 24 || area.height < 10 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 24x10.")
            .style(Style::default().fg(colors.error()));
        frame.render_widget(warning, area);
        return;
    }

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Splash => render_splash(frame, app),
        AppScreen::ModeSelect => render_mode_select(frame, app),
        AppScreen::DurationSelect => render_duration_select(frame, app),
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Done => render_done(frame, app),
    }
}

fn render_splash(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let compact = area.width < 56 || area.height < 18;
    let mut lines: Vec<Line> = Vec::new();
    if compact {
        lines.push(Line::from(Span::styled(
            "keyflow",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        for row in SPLASH_ART {
            lines.push(Line::from(Span::styled(
                row,
                Style::default().fg(colors.accent()),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Terminal typing trainer",
        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter to continue",
        Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "q quit",
        Style::default().fg(colors.text_pending()),
    )));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg())),
        );
    frame.render_widget(card, centered_rect(70, 70, area));
}

fn render_mode_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let hint = format!(
        "arrows or {} \u{2022} Enter to continue \u{2022} q quit",
        quick_pick_hint(app.mode_items.len())
    );
    let menu = SelectMenu::new(
        "Select Mode",
        &hint,
        &app.mode_items,
        app.mode_selected,
        app.theme,
    );
    frame.render_widget(menu, centered_rect(60, 80, area));
}

fn render_duration_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let hint = format!(
        "arrows or {} \u{2022} Enter to start \u{2022} Esc back",
        quick_pick_hint(app.duration_items.len())
    );
    let menu = SelectMenu::new(
        "Select Duration",
        &hint,
        &app.duration_items,
        app.duration_selected,
        app.theme,
    );
    frame.render_widget(menu, centered_rect(60, 80, area));
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(session) = app.session.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        " keyflow ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let stats = if area.width < 56 {
        format!(
            " wpm {:.0}  acc {:.0}%  t {:.1}s",
            session.wpm(),
            session.accuracy(),
            session.remaining_secs()
        )
    } else {
        format!(
            " mode {}   wpm {:.0}   acc {:.1}%   chars {}   time {:.1}s",
            session.mode.label(),
            session.wpm(),
            session.accuracy(),
            session.total_typed,
            session.remaining_secs()
        )
    };
    let stats_line = Paragraph::new(Line::from(Span::styled(
        stats,
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(stats_line, layout[1]);

    if app.is_fetching() {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "fetching next prompt...",
            Style::default().fg(colors.text_pending()),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg())),
        );
        frame.render_widget(waiting, layout[2]);
    } else {
        frame.render_widget(TypingArea::new(session, app.theme), layout[2]);
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        " backspace edit \u{2022} Esc menu \u{2022} ctrl+c quit",
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_done(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(result) = app.last_result.as_ref() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Session complete",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("wpm       {:.0}", result.wpm),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!("accuracy  {:.1}%", result.accuracy),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!("keystrokes {}", result.total_typed),
            Style::default().fg(colors.fg()),
        )),
    ];
    if let Some(best) = app.history.best_wpm(&result.mode) {
        let label = if result.wpm >= best {
            format!("new best for {} mode", result.mode)
        } else {
            format!("best for {} mode: {best:.0} wpm", result.mode)
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(colors.success()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "r retry \u{2022} Enter menu \u{2022} q quit",
        Style::default().fg(colors.text_pending()),
    )));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg())),
        );
    frame.render_widget(card, centered_rect(50, 60, area));
}
