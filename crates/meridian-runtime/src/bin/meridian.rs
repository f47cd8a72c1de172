use std::error::Error;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use meridian_runtime::{init_tracing, serve, Cli, ClockController};
use meridian_time::SystemTimeSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_format)?;

    let config = cli.config()?;
    let mut controller = ClockController::new(SystemTimeSource, &config)?;

    if cli.once {
        controller.tick()?;
        println!("{}", controller.handle().page());
        return Ok(());
    }

    let handle = controller.handle();
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
        }
        shutdown.cancel();
    });

    let server = tokio::spawn(serve(config.bind, handle, cancel.clone()));
    let stats = controller.run(cancel.clone()).await;
    cancel.cancel();
    server.await??;

    let stats = stats?;
    info!(
        ticks = stats.ticks,
        cards_created = stats.cards_created,
        "meridian stopped"
    );
    Ok(())
}
