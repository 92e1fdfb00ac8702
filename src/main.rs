use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use lbkit::config::Config;
use lbkit::{
    format_api_error, ApiClient, BalancingAlgorithm, ForwardingRule, HttpTransport, ListOptions,
    LoadBalancerReq,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage load balancers from the command line
#[derive(Parser, Debug)]
#[command(name = "lbkit", version, about, long_about = None)]
struct Args {
    /// API endpoint (overrides config and LBKIT_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List load balancers
    List(PageArgs),
    /// Show one load balancer
    Get { id: String },
    /// Create a load balancer
    Create {
        #[arg(long)]
        region: String,
        #[arg(long)]
        label: Option<String>,
        /// Attached instance ID (repeatable)
        #[arg(long = "instance")]
        instances: Vec<String>,
        /// roundrobin or leastconn
        #[arg(long)]
        algorithm: Option<String>,
    },
    /// Rename a load balancer or change its algorithm
    Update {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long = "instance")]
        instances: Vec<String>,
        #[arg(long)]
        algorithm: Option<String>,
    },
    /// Delete a load balancer
    Delete { id: String },
    /// Manage forwarding rules
    #[command(subcommand)]
    Rules(RulesCommand),
    /// Store the API key in the config file
    Login { api_key: String },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// List forwarding rules of a load balancer
    List {
        id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one forwarding rule
    Get { id: String, rule_id: String },
    /// Add a forwarding rule
    Create {
        id: String,
        #[arg(long)]
        frontend_protocol: String,
        #[arg(long)]
        frontend_port: u16,
        #[arg(long)]
        backend_protocol: String,
        #[arg(long)]
        backend_port: u16,
    },
    /// Remove a forwarding rule
    Delete { id: String, rule_id: String },
}

#[derive(ClapArgs, Debug)]
struct PageArgs {
    #[arg(long)]
    per_page: Option<u32>,
    #[arg(long)]
    cursor: Option<String>,
    /// Follow cursors and print every page
    #[arg(long)]
    all: bool,
}

impl PageArgs {
    fn options(&self) -> ListOptions {
        ListOptions {
            per_page: self.per_page,
            cursor: self.cursor.clone(),
            ..Default::default()
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Could not open log file {:?}: {}", log_path, err);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("lbkit started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("lbkit").join("lbkit.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".lbkit").join("lbkit.log");
    }
    PathBuf::from("lbkit.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_client(args: &Args, config: &Config) -> Result<ApiClient<HttpTransport>> {
    let credentials = config
        .effective_credentials()
        .context("No API key configured. Set LBKIT_API_KEY or run 'lbkit login <key>'")?;
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.effective_base_url());
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.effective_timeout());

    let transport = HttpTransport::new(&base_url, credentials, timeout)
        .map_err(|e| anyhow::anyhow!(format_api_error(&e)))?;

    Ok(ApiClient::new(transport).with_body_style(config.effective_body_style()))
}

async fn run(args: &Args, client: &ApiClient<HttpTransport>) -> Result<()> {
    let lbs = client.load_balancers();

    match &args.command {
        Command::List(page) if page.all => {
            let items = lbs.list_all(&page.options()).await?;
            print_json(&items)
        },
        Command::List(page) => {
            let (items, meta) = lbs.list(&page.options()).await?;
            print_json(&serde_json::json!({ "load_balancers": items, "meta": meta }))
        },
        Command::Get { id } => {
            let lb = lbs.get(id).await?;
            print_json(&lb)
        },
        Command::Create {
            region,
            label,
            instances,
            algorithm,
        } => {
            let req = LoadBalancerReq {
                region: Some(region.clone()),
                label: label.clone(),
                instances: instances.clone(),
                balancing_algorithm: algorithm.clone().map(BalancingAlgorithm::from),
                ..Default::default()
            };
            let lb = lbs.create(&req).await?;
            print_json(&lb)
        },
        Command::Update {
            id,
            label,
            instances,
            algorithm,
        } => {
            // Without --instance the current attachments are kept
            let instances = if instances.is_empty() {
                lbs.get(id).await?.instances
            } else {
                instances.clone()
            };
            let req = LoadBalancerReq {
                label: label.clone(),
                instances,
                balancing_algorithm: algorithm.clone().map(BalancingAlgorithm::from),
                ..Default::default()
            };
            Ok(lbs.update(id, &req).await?)
        },
        Command::Delete { id } => Ok(lbs.delete(id).await?),
        Command::Rules(RulesCommand::List { id, page }) if page.all => {
            let rules = lbs.list_all_forwarding_rules(id, &page.options()).await?;
            print_json(&rules)
        },
        Command::Rules(RulesCommand::List { id, page }) => {
            let (rules, meta) = lbs.list_forwarding_rules(id, &page.options()).await?;
            print_json(&serde_json::json!({ "forwarding_rules": rules, "meta": meta }))
        },
        Command::Rules(RulesCommand::Get { id, rule_id }) => {
            let rule = lbs.get_forwarding_rule(id, rule_id).await?;
            print_json(&rule)
        },
        Command::Rules(RulesCommand::Create {
            id,
            frontend_protocol,
            frontend_port,
            backend_protocol,
            backend_port,
        }) => {
            let rule = ForwardingRule::new(
                frontend_protocol.as_str(),
                *frontend_port,
                backend_protocol.as_str(),
                *backend_port,
            );
            let created = lbs.create_forwarding_rule(id, &rule).await?;
            print_json(&created)
        },
        Command::Rules(RulesCommand::Delete { id, rule_id }) => {
            Ok(lbs.delete_forwarding_rule(id, rule_id).await?)
        },
        Command::Login { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    if let Command::Login { api_key } = &args.command {
        config.set_api_key(api_key).context("Failed to save config")?;
        println!("API key saved to {:?}", Config::config_path().unwrap_or_default());
        return Ok(());
    }

    let client = build_client(&args, &config)?;

    if let Err(err) = run(&args, &client).await {
        tracing::error!("command failed: {:#}", err);
        match err.downcast_ref::<lbkit::Error>() {
            Some(api_err) => eprintln!("Error: {}", format_api_error(api_err)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}
