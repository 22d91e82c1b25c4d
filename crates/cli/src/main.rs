use clap::{Parser, Subcommand};
use lib::lang::Language;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay CLI: translate messages between a Korean and a Japanese Discord channel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a config template listing every setting.
    Init {
        /// Config file path (default: RELAY_CONFIG_PATH or ~/.relay/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Connect to Discord and relay messages between the two configured channels until Ctrl+C.
    Run {
        /// Config file path (default: RELAY_CONFIG_PATH or ~/.relay/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Translate one text through Papago with the configured credentials and print the result.
    Translate {
        /// Config file path (default: RELAY_CONFIG_PATH or ~/.relay/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Source language tag (ko, ja, en)
        #[arg(long, default_value = "ko")]
        from: Language,

        /// Target language tag (ko, ja, en)
        #[arg(long, default_value = "ja")]
        to: Language,

        /// Text to translate
        text: String,
    },
}

#[tokio::main]
async fn main() {
    // Before the logger, so RUST_LOG from .env applies; reported once logging is up.
    let dotenv = lib::config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Some(warning) = lib::config::dotenv_warning(&dotenv) {
        log::warn!("{}", warning);
    } else if let Ok(Some(path)) = &dotenv {
        log::debug!("loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("relay {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Run { config }) => {
            if let Err(e) = run_relay(config).await {
                log::error!("relay failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Translate {
            config,
            from,
            to,
            text,
        }) => {
            if let Err(e) = run_translate(config, from, to, &text).await {
                log::error!("translate failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let _dir = lib::init::init_config_dir(&path)?;
    println!("config template at {}", path.display());
    Ok(())
}

async fn run_relay(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let (config, path) = lib::config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    let settings = lib::config::resolve_settings(&config)?;
    lib::relay::run_relay(settings).await
}

async fn run_translate(
    config_path: Option<std::path::PathBuf>,
    from: Language,
    to: Language,
    text: &str,
) -> anyhow::Result<()> {
    let (config, _) = lib::config::load_config(config_path)?;
    let papago = lib::config::resolve_papago(&config)?;
    let client = lib::translate::PapagoClient::from_settings(papago);
    let translated = client.translate(text, from, to).await?;
    println!("{}", translated);
    Ok(())
}
