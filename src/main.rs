use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use smz_bot::application::commands::default_registry;
use smz_bot::application::context::BotContext;
use smz_bot::application::errors::BotError;
use smz_bot::application::messaging::MessageDispatcher;
use smz_bot::application::stores::CommandStatStore;
use smz_bot::infrastructure::adapters::console::{ConsoleAdapter, ConsoleInput};
use smz_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "smz-bot")]
#[command(about = "Chat bot with a prefix command dispatcher and a small shop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Database directory (overrides config)
    #[arg(short, long)]
    data_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console transport
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Print command usage statistics
    Stats,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.data_dir),
        Commands::Version => {
            println!("smz-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::Stats => print_stats(&cli.config, cli.data_dir),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str, data_dir: Option<String>) -> Config {
    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };
    if let Some(dir) = data_dir {
        config.database.directory = dir.into();
    }
    config
}

fn run_bot(config_path: &str, data_dir: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, data_dir);
    tracing::info!("Starting {} v{}", config.bot.name, config.bot.version);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let gateway = Arc::new(ConsoleAdapter::new(config.bot.name.clone()));
        let bot = Arc::new(BotContext::new(config, gateway));
        let dispatcher = Arc::new(MessageDispatcher::new(bot, default_registry()));
        run_console_bot(dispatcher).await;
    });
    Ok(())
}

async fn run_console_bot(dispatcher: Arc<MessageDispatcher>) {
    let bot = Arc::clone(dispatcher.bot());
    let policy = bot.policy.snapshot();
    tracing::info!(
        "Bot started: {} ({} commands, prefix {:?}, {})",
        bot.gateway.bot_info().name,
        dispatcher.registry().len(),
        policy.prefix(),
        if policy.is_public() { "public" } else { "private" }
    );
    println!("Ketik pesan sebagai: <nomor> <pesan> atau <grup>/<nomor> <pesan>");

    let mut input = ConsoleInput::stdin();
    let mut in_flight = tokio::task::JoinSet::new();
    loop {
        tokio::select! {
            message = input.next_message() => {
                let Some(message) = message else { break };
                let dispatcher = Arc::clone(&dispatcher);
                in_flight.spawn(async move {
                    dispatcher.dispatch(&message).await;
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    let reports = bot.tasks.wait_all().await;
    tracing::info!("Shutting down after {} background runs", reports.len());
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    println!("{}", config.to_yaml()?);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

fn print_stats(config_path: &str, data_dir: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, data_dir);
    let store = CommandStatStore::open(config.database.directory.join("commands.json"));
    let mut stats: Vec<_> = store.get_all_stats().into_iter().collect();
    if stats.is_empty() {
        println!("No commands recorded yet.");
        return Ok(());
    }
    stats.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    println!("{:<16} {:>8} {:>8} {:>8} {:>8}", "COMMAND", "COUNT", "OK", "FAILED", "USERS");
    for (name, stat) in stats {
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>8}",
            name,
            stat.count,
            stat.success,
            stat.failed,
            stat.users.len()
        );
    }
    Ok(())
}
