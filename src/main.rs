//! feedreel — a terminal feed reader.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  channel   ┌──────────┐  draw()  ┌──────────┐
//! │ feed::    │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ fetch     │ (streamed  │ (state)  │          │ (render) │
//! │ (threads) │   feeds)   └──────────┘          └──────────┘
//! └───────────┘                 ▲
//!                               │ handle_key_event()
//!                          ┌──────────┐
//!                          │ input.rs │
//!                          └──────────┘
//! ```
//!
//! * **`feed/`** — the aggregation pipeline: concurrent fetch, item
//!   normalization, filters, display modes, and the on-disk archive.
//! * **`render`** — static mode: one tab-separated line per item.
//! * **`extract`** — full-article text extraction for the detail pane.
//! * **`app` / `ui` / `input`** — interactive mode: state, drawing, keys.
//! * **`main`** — wires everything together: parse the CLI, read the URL
//!   list, build the filter pipeline, and run the chosen mode.

mod app;
mod extract;
mod feed;
mod input;
mod render;
mod ui;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use app::App;
use extract::LazyExtractor;
use feed::{
    Deduplicate, DisplayMode, Filters, FormatSettings, MaxItems, MaxItemsPerChannel, OldestItem,
};

/// Default feed list location, relative to `$HOME`.
const DEFAULT_FEEDS_FILE: &str = ".rss/urls.txt";

#[derive(Parser)]
#[command(name = "feedreel", version, about = "Fetch, filter, and browse syndication feeds")]
struct Cli {
    /// Path to the newline-delimited feed URL list (# lines are comments)
    #[arg(long, global = true)]
    feeds: Option<PathBuf>,

    /// Maximum age of items, in hours
    #[arg(long, default_value_t = 24, global = true)]
    max_hours: i64,

    /// Item cap: total for `feed`, per channel elsewhere (0 = unlimited)
    #[arg(long, default_value_t = 0, global = true)]
    limit: usize,

    /// Also archive fetched feed documents into this folder
    #[arg(long, global = true)]
    archive: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print all items, newest first
    Feed,
    /// Print items grouped by feed
    Group,
    /// Browse feeds interactively in a two-pane TUI
    Browse {
        /// Group the list by feed instead of newest-first
        #[arg(long)]
        grouped: bool,
    },
    /// Pick a single feed from the list and browse it
    Select,
    /// Print previously archived feeds without fetching anything
    Archived,
    /// Open the feed list in $EDITOR
    Edit,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let feeds_path = match &cli.feeds {
        Some(path) => path.clone(),
        None => default_feeds_path()?,
    };

    let max_age = chrono::Duration::hours(cli.max_hours);
    let base = || Filters::new().with(OldestItem::new(max_age)).with(Deduplicate::new());

    match cli.command {
        Command::Edit => edit_feeds_file(&feeds_path),
        Command::Feed => run_static(
            &load_urls(&feeds_path)?,
            DisplayMode::ReverseChronological,
            base().with(MaxItems::new(cli.limit)),
            cli.archive.as_deref(),
        ),
        Command::Group => run_static(
            &load_urls(&feeds_path)?,
            DisplayMode::Grouped,
            base().with(MaxItemsPerChannel::new(cli.limit)),
            cli.archive.as_deref(),
        ),
        Command::Browse { grouped } => {
            let mode = if grouped {
                DisplayMode::Grouped
            } else {
                DisplayMode::ReverseChronological
            };
            run_browser(
                load_urls(&feeds_path)?,
                mode,
                base().with(MaxItemsPerChannel::new(cli.limit)),
            )
        }
        Command::Select => {
            let urls = load_urls(&feeds_path)?;
            let url = select_single_feed(&urls)?;
            run_browser(
                vec![url],
                DisplayMode::ReverseChronological,
                base().with(MaxItemsPerChannel::new(cli.limit)),
            )
        }
        Command::Archived => {
            let folder = cli.archive.context("`archived` needs --archive <DIR>")?;
            // Archived items are old by definition; no age filter here.
            let feeds: Vec<_> = feed::load_all(&folder)?.into_iter().map(Some).collect();
            let mut filters = Filters::new()
                .with(Deduplicate::new())
                .with(MaxItemsPerChannel::new(cli.limit));
            let items = feed::get_feed_items(&feeds, &mut filters);
            let settings = FormatSettings {
                colour: io::stdout().is_terminal(),
                include_links: true,
            };
            render::render(&mut io::stdout().lock(), items, DisplayMode::Grouped, &settings)?;
            Ok(())
        }
    }
}

fn default_feeds_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set; pass --feeds")?;
    Ok(PathBuf::from(home).join(DEFAULT_FEEDS_FILE))
}

fn load_urls(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let urls = feed::read_urls(BufReader::new(file))?;
    ensure!(!urls.is_empty(), "no feed URLs in {}", path.display());
    Ok(urls)
}

// ---------------------------------------------------------------------------
// Static mode
// ---------------------------------------------------------------------------

/// Fetch every feed, run the batch through the pipeline, and print one line
/// per item to stdout.
fn run_static(
    urls: &[String],
    mode: DisplayMode,
    mut filters: Filters,
    archive: Option<&Path>,
) -> Result<()> {
    let feeds = feed::refresh_feeds(urls);

    if let Some(folder) = archive {
        std::fs::create_dir_all(folder)
            .with_context(|| format!("creating {}", folder.display()))?;
        for fetched in feeds.iter().flatten() {
            if let Err(e) = feed::store(fetched, folder) {
                warn!("archiving {}: {e}", fetched.title());
            }
        }
    }

    let items = feed::get_feed_items(&feeds, &mut filters);
    let settings = FormatSettings {
        colour: io::stdout().is_terminal(),
        include_links: true,
    };
    let mut stdout = io::stdout().lock();
    render::render(&mut stdout, items, mode, &settings)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive mode
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Run the two-pane interactive session.
///
/// Fetches stream in over a channel while the event loop runs at ~10 fps
/// (100 ms tick).  Each iteration:
///   1. Drain any newly arrived feeds; unpack, filter, display-order, and
///      insert their items (all on this thread, so widget state has a
///      single writer).
///   2. Render the UI.
///   3. Poll for keyboard input (non-blocking, up to tick_rate).
///
/// The extraction engine warms up on a background thread meanwhile; the
/// first article selection waits on it if it is not ready yet.
fn run_browser(urls: Vec<String>, mode: DisplayMode, mut filters: Filters) -> Result<()> {
    install_panic_hook();

    let rx = feed::refresh_feeds_async(urls);
    let mut extractor = LazyExtractor::start();

    let mut guard = TerminalGuard::new()?;
    // Items from the last hour get the recency highlight.
    let mut app = App::new(Utc::now() - chrono::Duration::hours(1));
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Drain arrived feeds.
        while let Ok(result) = rx.try_recv() {
            match result {
                Ok(raw) => {
                    let items = feed::unpack_feed(&raw, &mut filters);
                    app.status = format!("{}: {} items", raw.title(), items.len());
                    app.insert_items(mode.apply(items));
                }
                // A failed source costs nothing but a status line.
                Err(e) => app.status = e.to_string(),
            }
        }

        // 2. Render.
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key, &mut extractor);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

// ---------------------------------------------------------------------------
// select / edit subcommands
// ---------------------------------------------------------------------------

/// Print the numbered URL list and read an index from stdin, retrying on
/// invalid input.
fn select_single_feed(urls: &[String]) -> Result<String> {
    for (i, url) in urls.iter().enumerate() {
        println!("{i}:\t{url}");
    }

    let stdin = io::stdin();
    loop {
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            bail!("no feed selected");
        }
        match line.trim().parse::<usize>() {
            Ok(i) if i < urls.len() => return Ok(urls[i].clone()),
            Ok(i) => eprintln!("{i} is out of range (0..{})", urls.len() - 1),
            Err(e) => eprintln!("{e}"),
        }
    }
}

fn edit_feeds_file(path: &Path) -> Result<()> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".into());
    let status = std::process::Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("launching {editor}"))?;
    ensure!(status.success(), "{editor} exited with {status}");
    Ok(())
}
