use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storywell_application::WritingAssistantService;
use storywell_core::config::AppConfig;
use storywell_infrastructure::{ConfigService, StorywellPaths};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "storywell")]
#[command(about = "Storywell - write short stories with an AI assistant", long_about = None)]
struct Cli {
    /// Deployment host; decides between owner and restricted mode
    #[arg(long, global = true)]
    host: Option<String>,

    /// URL the app is running at, checked against the authorized URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Log filter, e.g. `info` or `storywell_core=debug` (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory holding config, settings and usage data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat with the assistant
    Chat,
    /// Send a single prompt to the assistant
    Ask {
        /// The prompt text
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Suggest a short story idea
    Idea {
        /// Optional theme for the idea
        #[arg(num_args = 0..)]
        theme: Vec<String>,
    },
    /// Write the next paragraph of a story
    Continue {
        /// Story title
        #[arg(long, default_value = "")]
        title: String,
        /// File containing the story so far
        file: PathBuf,
    },
    /// Proofread a story
    Polish {
        /// File containing the passage to polish
        file: PathBuf,
    },
    /// Show or change the authorized URL
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show the deployment mode and remaining AI requests
    Quota,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Set the URL allowed to use AI features in restricted mode
    SetUrl {
        /// Origin or URL prefix, e.g. https://stories.example.com
        url: String,
    },
}

fn load_config(cli: &Cli, paths: &StorywellPaths) -> Result<AppConfig> {
    let mut config = match ConfigService::new(paths)?.load() {
        Ok(config) => config,
        Err(e) if e.is_serialization() => {
            bail!("config.toml is not valid, fix or delete it: {}", e)
        }
        Err(e) => return Err(e).context("Failed to load config.toml"),
    };

    if let Some(host) = &cli.host {
        config.deployment.host = host.clone();
    }
    if let Some(url) = &cli.url {
        config.deployment.current_url = url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = StorywellPaths::new(cli.data_dir.as_deref());

    let _log_guard = logging::init(cli.log_level.as_deref(), &paths.logs_dir()?)?;

    let config = load_config(&cli, &paths)?;
    let service = WritingAssistantService::open(&paths, &config)
        .await
        .context("Failed to start the writing assistant")?;

    match cli.command {
        Commands::Chat => commands::chat::run(&service).await?,
        Commands::Ask { prompt } => commands::write::ask(&service, &prompt.join(" ")).await?,
        Commands::Idea { theme } => commands::write::idea(&service, &theme.join(" ")).await?,
        Commands::Continue { title, file } => {
            commands::write::continue_story(&service, &title, &file).await?
        }
        Commands::Polish { file } => commands::write::polish(&service, &file).await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&service).await?,
            SettingsAction::SetUrl { url } => commands::settings::set_url(&service, &url).await?,
        },
        Commands::Quota => commands::quota::show(&service).await?,
    }

    Ok(())
}
