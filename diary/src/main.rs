//! Interactive memory-diary reader.
//!
//! A terminal frontend over `diary-core`: reads a branching story,
//! tracks which memories have been observed, and offers the scattered
//! diary overview plus the observation-graph overlay.

mod app;
mod events;
mod screen;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use diary_core::{story, FileStore, ReaderSession, StoryGraph, VisitTracker};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use screen::Screen;
use ui::render::render;
use ui::theme::DiaryTheme;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let graph = match load_story(&args) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Failed to load story: {e}");
            std::process::exit(1);
        }
    };

    let data_dir = flag_value(&args, "--data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let tracker = VisitTracker::load(Box::new(FileStore::in_dir(data_dir)));
    let session = ReaderSession::new(graph, tracker, Screen::new());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let theme = DiaryTheme::default();

    loop {
        // Apply any answered reset before drawing.
        app.poll_reset();

        terminal.draw(|f| render(f, &app, &theme))?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Story content from `--story <file>`, or the built-in sample.
fn load_story(args: &[String]) -> Result<StoryGraph, Box<dyn std::error::Error>> {
    match flag_value(args, "--story") {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            Ok(StoryGraph::from_json_str(&content)?)
        }
        None => Ok(story::sample_story()),
    }
}

/// Value following a `--flag` argument, if present.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn print_help() {
    println!("diary - interactive memory-diary reader");
    println!();
    println!("USAGE:");
    println!("  diary [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help           Show this help message");
    println!("  --story <FILE>       Story content JSON (default: built-in sample)");
    println!("  --data-dir <DIR>     Where progress is persisted (default: .)");
    println!();
    println!("KEYS:");
    println!("  1-9        choose an action / jump to an overview point");
    println!("  o          toggle the overview");
    println!("  g          open/close the observation graph");
    println!("  Tab, h/l   move between points or graph markers");
    println!("  Enter      focus a point, open a focused point or marker");
    println!("  r          reset all progress (asks first)");
    println!("  q          quit");
}
