use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use falling_blocks::{CellState, Color as PaletteColor, Game, GameState, COLS, ROWS};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for the piece sequence. The same seed replays the same pieces.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Append log records to this file. Without it, logs are discarded.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ============================================================================
// Logging
// ============================================================================

// The terminal is in raw mode while playing, so records only go to a file.
fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
    Ok(())
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

fn palette_color(color: PaletteColor) -> Color {
    match color {
        PaletteColor::Cyan => Color::Cyan,
        PaletteColor::Blue => Color::Blue,
        PaletteColor::Orange => Color::Rgb(255, 165, 0),
        PaletteColor::Yellow => Color::Yellow,
        PaletteColor::Green => Color::Green,
        PaletteColor::Purple => Color::Magenta,
        PaletteColor::Red => Color::Red,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Front-end screens. The engine itself only knows playing and game over.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Screen {
    Welcome,
    Game,
}

fn render(frame: &mut Frame, game: &Game, screen: Screen) {
    let area = frame.size();
    render_game(frame, game, area);

    match (screen, game.state()) {
        (Screen::Welcome, _) => render_welcome(frame, area),
        (Screen::Game, GameState::GameOver) => render_game_over(frame, game, area),
        (Screen::Game, GameState::Playing) => {}
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let grid_display_width = (COLS as u16 * CELL_WIDTH) + 2;
    let grid_display_height = ROWS as u16 + 2;
    let info_width = 14;
    let total_width = grid_display_width + info_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→: Move | ↓: Drop | ↑: Rotate | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blocks ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .visible_cells()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    CellState::Empty => Span::raw(EMPTY_CHAR),
                    CellState::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(palette_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score())),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_popup(frame: &mut Frame, area: Rect, title: &str, text: Vec<Line>) {
    let height = text.len() as u16 + 2;
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(28, height, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("FALLING BLOCKS", Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from("Press ENTER to start"),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_popup(frame, area, "Welcome", text);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score())),
        Line::from(format!("Level: {}", game.level())),
        Line::from(""),
        Line::from("Press ENTER to restart"),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_popup(frame, area, "Game Over", text);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut game: Game) -> io::Result<()> {
    let mut screen = Screen::Welcome;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &game, screen))?;

        let tick_duration = Duration::from_millis(game.speed_interval());
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Enter if screen == Screen::Welcome => {
                            game.start();
                            screen = Screen::Game;
                            last_tick = Instant::now();
                        }
                        KeyCode::Enter if game.is_game_over() => {
                            game.restart();
                            last_tick = Instant::now();
                        }
                        // The engine ignores these once the game is over.
                        _ if screen == Screen::Game => match key.code {
                            KeyCode::Left => {
                                game.move_left();
                            }
                            KeyCode::Right => {
                                game.move_right();
                            }
                            KeyCode::Down => game.soft_drop(),
                            KeyCode::Up => {
                                game.rotate();
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
        }

        if screen == Screen::Game && last_tick.elapsed() >= tick_duration {
            game.tick();
            game.take_events();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let game = match args.seed {
        Some(seed) => Game::seeded(seed),
        None => Game::new(),
    };

    // Leave the alternate screen before the panic message is printed.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, game);

    restore_terminal()?;
    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_reach_the_log_file() {
        let path = std::env::temp_dir().join(format!("falling-blocks-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        init_logging(&path).expect("logger installs once");
        log::info!("game over, final score 300");
        log::logger().flush();

        let contents = std::fs::read_to_string(&path).expect("log file exists");
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("game over, final score 300"));
    }
}
