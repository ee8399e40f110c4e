use anyhow::Result;
use clap::Parser;
use hybrid_rs::Config;

#[derive(Parser)]
#[clap(about = "1D hybrid particle-in-cell simulation")]
pub struct CommandLineArguments {
    /// Path to the TOML configuration
    #[clap(long, short, default_value = "config.toml")]
    config: String,
}

fn main() -> Result<()> {
    env_logger::builder().format_timestamp_secs().init();

    let args = CommandLineArguments::parse();
    let cfg = Config::from_file(&args.config)?;
    hybrid_rs::run(cfg)
}
