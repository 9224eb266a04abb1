use kubecreds::{
    AppState, AwsCli, Config, CredentialsFile, FlashKey, KubeconfigFile, Settings, Views,
    create_app,
};

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Server configuration
const HOST: &str = "127.0.0.1";
const PORT: u16 = 5000;

/// kubecreds: manage AWS credential profiles and link them to EKS kubeconfig contexts
#[derive(Parser, Debug)]
#[command(name = "kubecreds")]
#[command(about = "Local web UI for AWS credential profiles and their EKS kubeconfig contexts", long_about = None)]
struct Cli {
    /// Path to an optional JSON configuration file
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = PORT)]
    port: u16,

    /// AWS shared credentials file [default: ~/.aws/credentials]
    #[arg(long, env = "AWS_SHARED_CREDENTIALS_FILE")]
    credentials_file: Option<PathBuf>,

    /// Kubeconfig file read for linked contexts and written by update-kubeconfig [default: ~/.kube/config]
    #[arg(long, env = "KUBECREDS_KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// aws CLI executable [default: aws]
    #[arg(long, env = "AWS_CLI")]
    aws_cli: Option<String>,

    /// Region passed to the aws eks commands [default: us-east-1]
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Seconds before a running aws command is killed [default: 120]
    #[arg(long)]
    command_timeout_secs: Option<u64>,

    /// Key used to sign flash-message cookies [default: random per process]
    #[arg(long, env = "FLASH_SECRET", hide_env_values = true)]
    flash_secret: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Config {
        Config {
            credentials_file: self.credentials_file.clone(),
            kubeconfig: self.kubeconfig.clone(),
            aws_cli: self.aws_cli.clone(),
            region: self.region.clone(),
            command_timeout_secs: self.command_timeout_secs,
            flash_secret: self.flash_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load optional configuration file
    let file_config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {}", path);
                cfg
            }
            Err(e) => {
                tracing::error!("Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    // Command line and environment > config file > defaults
    let settings = match Settings::resolve(cli.overrides().or(file_config)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Credentials file: {}", settings.credentials_file.display());
    tracing::info!("Kubeconfig: {}", settings.kubeconfig.display());
    tracing::info!(
        "aws CLI: {} (region {}, timeout {}s)",
        settings.aws_cli,
        settings.region,
        settings.command_timeout.as_secs()
    );

    let flash = match FlashKey::new(settings.flash_secret.as_bytes()) {
        Ok(flash) => flash,
        Err(e) => {
            tracing::error!("Invalid flash secret: {}", e);
            std::process::exit(1);
        }
    };

    let views = match Views::new() {
        Ok(views) => views,
        Err(e) => {
            tracing::error!("Failed to compile templates: {}", e);
            std::process::exit(1);
        }
    };

    let cluster_cli = AwsCli::new(&settings.aws_cli, &settings.region)
        .with_timeout(settings.command_timeout)
        .with_credentials_file(&settings.credentials_file)
        .with_kubeconfig(&settings.kubeconfig);

    // Create shared app state
    let app_state = AppState::new(
        Arc::new(CredentialsFile::new(&settings.credentials_file)),
        KubeconfigFile::new(&settings.kubeconfig),
        Arc::new(cluster_cli),
        flash,
        views,
        settings.credentials_file.display().to_string(),
    );

    let app = create_app(app_state);

    // Start server
    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("kubecreds listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
