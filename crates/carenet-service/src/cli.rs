use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "carenet-risk-service")]
#[command(author, version, about = "CARE-NET dropout risk prediction service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", env = "CARENET_CONFIG")]
    pub config: String,

    /// Classifier artifact path
    #[arg(short, long, env = "CARENET_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Feature manifest path
    #[arg(short, long, env = "CARENET_FEATURE_NAMES_PATH")]
    pub feature_names: Option<PathBuf>,

    /// YAML reason policy replacing the built-in rules
    #[arg(long)]
    pub reasons_policy: Option<PathBuf>,

    /// Listen address
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "PORT")]
    pub port: Option<u16>,

    /// Defer model loading until the first request
    #[arg(long)]
    pub lazy: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
