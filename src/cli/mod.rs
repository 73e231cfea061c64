use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use commands::{serve, ServeOverrides};

#[derive(Parser)]
#[command(name = "price-forecast")]
#[command(about = "Wholesale price forecast tool: web frontend and prediction relay")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    ///
    /// Settings are read from defaults, the optional config file and
    /// PRICE_FORECAST_* environment variables; flags given here win.
    Serve {
        /// Configuration file (TOML, YAML, JSON, ...)
        #[arg(short, long, env = "PRICE_FORECAST_CONFIG")]
        config: Option<PathBuf>,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long)]
        bind_address: Option<String>,

        /// Base URL of the prediction service
        ///
        /// Requests are forwarded to {URL}/predict.
        #[arg(short, long)]
        prediction_url: Option<String>,

        /// Directory with the built frontend to serve
        #[arg(short, long)]
        static_dir: Option<PathBuf>,

        /// Expose Prometheus metrics on /metrics
        #[arg(long)]
        metrics: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                config,
                bind_address,
                prediction_url,
                static_dir,
                metrics,
            } => {
                let overrides = ServeOverrides {
                    bind_address,
                    prediction_url,
                    static_dir,
                    metrics,
                };
                serve(config.as_deref(), overrides).await?;
            }
        }
        Ok(())
    }
}
