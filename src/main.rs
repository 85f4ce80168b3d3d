use std::io::{self, stdout, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use folio::app::LogicThread;
use folio::config::Config;
use folio::counter::CounterConfig;
use folio::headless::{self, CountRecord, TypeRecord};
use folio::render::RenderState;
use folio::typewriter::TypewriterConfig;
use folio::{flog, ui, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Folio - a terminal portfolio with a typewriter headline and count-up stats
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    FOLIO_DEBUG=1       Enable debug logging (alternative to --debug)\n    FOLIO_LOG=<level>   error|warn|info|debug|trace"
)]
pub struct Cli {
    /// Enable debug logging (writes to ~/.folio/folio.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Config file (default: ~/.folio/folio.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the typewriter in the terminal without the TUI
    Type {
        /// Full passes over the word list before exiting
        #[arg(long, default_value_t = 1)]
        cycles: u32,

        /// Override the configured words (repeatable)
        #[arg(short = 'w', long = "word")]
        words: Vec<String>,

        /// Emit one JSON object per frame instead of animating
        #[arg(long)]
        json: bool,
    },

    /// Run a single counter from zero to TARGET, as if it scrolled into view
    Count {
        #[arg(allow_negative_numbers = true)]
        target: i64,

        /// Label shown next to the value
        #[arg(long, default_value = "")]
        label: String,

        /// Text appended to the value
        #[arg(long, default_value = "%")]
        suffix: String,

        /// Emit one JSON object per frame instead of animating
        #[arg(long)]
        json: bool,
    },

    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    folio::log::init(cli.debug);

    let config_path = Config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Init { force }) => return run_init(&config_path, force),
        Some(Command::Type {
            cycles,
            words,
            json,
        }) => {
            let config = Config::load_from(&config_path)?;
            return run_type(config, cycles, words, json);
        }
        Some(Command::Count {
            target,
            label,
            suffix,
            json,
        }) => {
            let counter = CounterConfig::new(target, label).with_suffix(suffix);
            return run_count(counter, json);
        }
        None => {}
    }

    if cli.debug {
        flog!("folio starting (debug mode enabled)");
    } else {
        flog!("folio starting");
    }

    let config = Config::load_from(&config_path)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle = thread::spawn(move || {
        LogicThread::run(config, Some(config_path), state_tx, shutdown_clone)
    });

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle.join();
    restore_terminal(&mut terminal)?;

    // Surface a logic thread failure once the terminal is usable again
    if let Ok(Err(e)) = logic_result {
        eprintln!("folio: {}", e);
        return Err(e);
    }
    result
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    flog!("Init command: path={} force={}", path.display(), force);
    if path.exists() && !force {
        println!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }
    Config::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_type(config: Config, cycles: u32, words: Vec<String>, json: bool) -> Result<()> {
    let typewriter = if words.is_empty() {
        config.typewriter
    } else {
        TypewriterConfig {
            words,
            ..config.typewriter
        }
    };
    let prefix = config.profile.typewriter_prefix;
    flog!(
        "Type command: words={:?} cycles={} json={}",
        typewriter.words,
        cycles,
        json
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(headless::run_typewriter(typewriter, cycles, |record: TypeRecord| {
        if json {
            if let Ok(line) = serde_json::to_string(&record) {
                println!("{}", line);
            }
        } else {
            let mut out = stdout();
            let _ = execute!(out, Clear(ClearType::CurrentLine));
            let _ = write!(out, "\r{}{}▌", prefix, record.text);
            let _ = out.flush();
        }
    }))?;

    if !json {
        println!();
    }
    Ok(())
}

fn run_count(counter: CounterConfig, json: bool) -> Result<()> {
    flog!("Count command: target={} json={}", counter.target, json);
    let label = counter.label.clone();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(headless::run_counter(counter, |record: CountRecord| {
        if json {
            if let Ok(line) = serde_json::to_string(&record) {
                println!("{}", line);
            }
        } else {
            let mut out = stdout();
            let _ = write!(out, "\r{:>8}  {}", record.display, label);
            let _ = out.flush();
        }
    }))?;

    if !json {
        println!();
    }
    Ok(())
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
