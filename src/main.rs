use anyhow::Context;
use tracing::{error, info};

use fieldplot::cli::parse_args;
use fieldplot::utils::conf_helper::init_config;
use fieldplot::utils::logging::init_logging;
use fieldplot::PlotError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(PlotError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    init_logging(cli.log_level);

    let config = init_config(cli.config.as_deref())
        .await
        .context("loading render config")?;

    if let Err(e) = fieldplot::app::run(&cli, config).await {
        error!("{}", e);
        return Err(e.into());
    }

    info!("done");
    Ok(())
}
