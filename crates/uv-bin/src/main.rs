//! A thin demo binary: decodes live terminal input through `uv-input` and
//! renders a tiny scrolling event log through `uv-render`. Exists to prove
//! the two halves of the toolkit compose against a real terminal; the
//! editor on top of this is somebody else's crate.

use anyhow::Result;
use clap::Parser;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use uv_events::{Event, Key};
use uv_input::{stream_events, Decoder, LegacyTable, ShutdownListener};
use uv_model::{Buffer, Cell};
use uv_render::Renderer;
use uv_term::{CrosstermBackend, TerminalBackend, TerminalCapabilities, TerminalGuard};
use uv_text::{characters, WidthMethod};

const EVENT_CHANNEL_CAP: usize = 256;
const LOG_ROWS: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "uv-demo", version, about = "Ultraviolet smoke-test demo")]
struct Args {
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    config: uv_config::Config,
    capabilities: TerminalCapabilities,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self { backend: CrosstermBackend::new(), log_guard: None }
    }

    fn run<'a>(&'a mut self) -> Result<RuntimeContext<'a>> {
        self.configure_logging();
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        self.backend.set_title("uv-demo")?;
        let guard = self.backend.enter_guard()?;
        let capabilities = self.backend.capabilities();

        let args = Args::parse();
        let config = uv_config::load_from(args.config, true)?;

        Ok(RuntimeContext { config, capabilities, terminal_guard: guard })
    }

    fn configure_logging(&mut self) {
        let log_path = PathBuf::from(".");
        let file_appender = tracing_appender::rolling::never(&log_path, "uv-demo.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(writer)
            .try_init()
        {
            Ok(()) => self.log_guard = Some(guard),
            Err(_) => {}
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn push_row(cells: Vec<Cell>, width: u16, buffer: &mut Buffer, row: u16) {
    for x in 0..width {
        let cell = cells.get(x as usize).cloned().unwrap_or_else(Cell::blank);
        buffer.set_cell(x, row, cell);
    }
}

fn paint(log: &[String], width: u16, height: u16) -> Buffer {
    let mut buffer = Buffer::new(width, height);
    let title = characters("ultraviolet demo — q or ctrl+c to quit", WidthMethod::Unicode);
    push_row(title, width, &mut buffer, 0);

    let start = height.saturating_sub(log.len() as u16 + 1).max(1);
    for (i, line) in log.iter().enumerate() {
        let row = start + i as u16;
        if row >= height {
            break;
        }
        push_row(characters(line, WidthMethod::Unicode), width, &mut buffer, row);
    }
    buffer
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::KeyPress(k) => Some(format!("key: {}", uv_events::format_key_combo(&k.code, k.mods))),
        Event::Paste(text) => Some(format!("paste: {text:?}")),
        Event::WindowSize { width, height } => Some(format!("window size: {width}x{height}")),
        Event::Focus => Some("focus".to_string()),
        Event::Blur => Some("blur".to_string()),
        _ => None,
    }
}

fn is_quit(event: &Event) -> bool {
    match event {
        Event::KeyPress(k) => uv_events::match_string(&k.code, k.mods, "q") || uv_events::match_string(&k.code, k.mods, "ctrl+c"),
        _ => false,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let RuntimeContext { config, capabilities, terminal_guard } = context;

    let term = std::env::var("TERM").unwrap_or_default();
    let decoder = Decoder::new(LegacyTable::from_term(&term), config.legacy_key_encoding);
    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (shutdown_handle, shutdown_listener) = ShutdownListener::new_pair();
    let input_task = tokio::spawn(stream_events(
        tokio::io::stdin(),
        tx,
        shutdown_listener,
        decoder,
        config.esc_timeout,
    ));

    let mut renderer = Renderer::new(stdout(), capabilities, config.render, config.color_profile);
    let mut log: Vec<String> = Vec::new();

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut target = paint(&log, width, height);
    renderer.render(&mut target)?;
    renderer.flush()?;

    while let Some(event) = rx.recv().await {
        if is_quit(&event) {
            break;
        }
        if let Some(line) = describe(&event) {
            log.push(line);
            if log.len() > LOG_ROWS {
                log.remove(0);
            }
            let (width, height) = crossterm::terminal::size().unwrap_or((width, height));
            let mut target = paint(&log, width, height);
            renderer.render(&mut target)?;
            renderer.flush()?;
        }
    }

    shutdown_handle.signal();
    match input_task.await {
        Ok(Err(err)) => warn!(target: "runtime.shutdown", %err, "input_task_failed"),
        Err(err) => warn!(target: "runtime.shutdown", %err, "input_task_join_failed"),
        Ok(Ok(())) => {}
    }

    let snapshot = renderer.render_metrics();
    info!(
        target: "runtime",
        frames = snapshot.frames,
        bytes_emitted = snapshot.bytes_emitted,
        scroll_hunks_applied = snapshot.scroll_hunks_applied,
        full_clears = snapshot.full_clears,
        "shutdown"
    );

    drop(terminal_guard);
    Ok(())
}
