use std::io::Write;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tokio::sync::mpsc::UnboundedSender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_core::config::Config;
use folio_core::content::PROFILE;
use folio_core::dance::{self, DanceClient, DanceStage};
use folio_core::gallery::{self, FLICKR_BASE_URL};
use folio_core::pixel::{self, PIXEL_ART_WIDTH};
use folio_core::{ChatController, Conversation, StreamEvent, SubmitOutcome};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{AppEvent, EventHandler};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Ryan Dumlao's portfolio in the terminal, with an AI assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant one question and stream the reply to stdout
    Ask {
        /// Your question
        question: String,
    },
    /// Animate the portrait into a short dance video saved to the cache directory
    Dance,
    /// Show or change saved settings
    Config {
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Model name, e.g. gemini-3-flash-preview
        #[arg(long)]
        model: Option<String>,
        /// Print the current settings
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    match cli.command {
        None => run_tui().await,
        Some(Commands::Ask { question }) => ask(&question).await,
        Some(Commands::Dance) => dance_once().await,
        Some(Commands::Config { api_key, model, show }) => configure(api_key, model, show),
    }
}

/// Log to a daily file; the terminal belongs to the UI
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = dirs::cache_dir()?.join("folio").join("logs");
    let file_appender = tracing_appender::rolling::daily(log_dir, "folio.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;

    Some(guard)
}

async fn run_tui() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        Config::new()
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(config);

    spawn_media_loaders(&events);
    info!("tui started");

    let result = run_loop(&mut terminal, &mut events, &mut app).await;

    app.shutdown();
    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut tui::Tui, events: &mut EventHandler, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(app, event),
                None => break,
            },
            Some(reply) = app.next_reply_event() => app.apply_reply(reply),
        }

        if app.take_dance_request() {
            spawn_dance(&app.config, events.sender());
        }
        app.consume_trigger();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Fetch the portrait and the photo album off the UI loop
fn spawn_media_loaders(events: &EventHandler) {
    let tx = events.sender();
    tokio::spawn(async move {
        let art = match pixel::fetch_pixel_portrait(PROFILE.portrait_url, PIXEL_ART_WIDTH).await {
            Ok(art) => Some(art),
            Err(e) => {
                warn!(error = %e, "portrait unavailable, showing monogram");
                None
            }
        };
        let _ = tx.send(AppEvent::Portrait(art));
    });

    let tx = events.sender();
    tokio::spawn(async move {
        let album = gallery::load_album(FLICKR_BASE_URL).await;
        let _ = tx.send(AppEvent::Album(album));
    });
}

/// Run the video job in the background, reporting stages as events
fn spawn_dance(config: &Config, tx: UnboundedSender<AppEvent>) {
    let client = match DanceClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            let _ = tx.send(AppEvent::Dance(DanceStage::Failed(e.user_message())));
            return;
        }
    };
    let Some(out_dir) = dance::default_output_dir() else {
        let reason = "No cache directory available for the video.".to_string();
        let _ = tx.send(AppEvent::Dance(DanceStage::Failed(reason)));
        return;
    };

    info!("dance requested");
    tokio::spawn(async move {
        let progress = tx.clone();
        let on_stage = move |stage: DanceStage| {
            let _ = progress.send(AppEvent::Dance(stage));
        };
        let last = match client.perform(PROFILE.portrait_url, &out_dir, on_stage).await {
            Ok(path) => DanceStage::Saved(path),
            Err(e) => {
                warn!(error = %e, "dance video failed");
                DanceStage::Failed(e.user_message())
            }
        };
        let _ = tx.send(AppEvent::Dance(last));
    });
}

async fn dance_once() -> Result<()> {
    let config = Config::load()?;
    let client = DanceClient::from_config(&config).map_err(|e| anyhow!(e.user_message()))?;
    let out_dir = dance::default_output_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?;

    println!("💃 {}\n", "Making the portrait dance".bold().magenta());
    let path = client
        .perform(PROFILE.portrait_url, &out_dir, |stage: DanceStage| {
            println!("  {}", stage.status_text().dimmed());
        })
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    println!("\n{} {}", "✓ Saved".green(), path.display());
    Ok(())
}

async fn ask(question: &str) -> Result<()> {
    let config = Config::load()?;
    let conversation = Conversation::from_config(&config);

    println!(
        "🤖 Asking {} ({})...\n",
        conversation.provider_name().bold().magenta(),
        conversation.model().dimmed()
    );

    let mut chat = ChatController::new(conversation);
    if chat.submit(question) == SubmitOutcome::EmptyInput {
        return Err(anyhow!("question is empty"));
    }

    let mut stdout = std::io::stdout();
    while let Some(event) = chat.next_event().await {
        match &event {
            StreamEvent::Fragment(text) => {
                print!("{}", text);
                stdout.flush()?;
            }
            StreamEvent::Finished => println!(),
            StreamEvent::Failed(err) => {
                println!("{}", err.user_message().red());
                warn!(error = %err, "ask failed");
            }
        }
        chat.apply(event);
    }

    Ok(())
}

fn configure(api_key: Option<String>, model: Option<String>, show: bool) -> Result<()> {
    let mut config = Config::load()?;
    let changed = api_key.is_some() || model.is_some();

    if let Some(key) = api_key {
        config.api_key = Some(key);
    }
    if let Some(model) = model {
        config.model = Some(model);
    }

    if changed {
        config.save()?;
        println!("{} {}", "✓ Saved".green(), Config::get_config_path()?.display());
    }

    if show || !changed {
        let key_status = match config.key_source() {
            Some(source) => format!("set ({})", source).green(),
            None => "missing".red(),
        };
        println!("\n{}", "⚙️  folio settings".bold().blue());
        println!("{}", "=".repeat(30).dimmed());
        println!("  API key:     {}", key_status);
        println!("  Model:       {}", config.model());
        println!("  Video model: {}", config.video_model());
        println!("  Temperature: {}", config.temperature());
        println!("  Endpoint:    {}", config.base_url());
        println!("  Timeout:     {}s", config.request_timeout().as_secs());
    }

    Ok(())
}
