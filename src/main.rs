use std::sync::Arc;

use eyre::{Context, Result};
use sidekick::cli::Command;
use sidekick::config::init_logger;
use sidekick::dispatch::{DispatchService, Dispatcher};
use sidekick::models::Action;
use sidekick::stdio;
use sidekick::storage::new_storage;
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    log::info!("{}", sidekick::config::version());

    let storage = new_storage(&config.storage)
        .await
        .wrap_err("initializing storage")?;

    let dispatcher = Arc::new(Dispatcher::new(storage));
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let token = CancellationToken::new();

    let mut task_set = task::JoinSet::new();

    let service_token = token.clone();
    let service_dispatcher = Arc::clone(&dispatcher);
    task_set.spawn(async move {
        let mut service = DispatchService::new(service_dispatcher, &mut action_rx, service_token);
        service.start().await
    });

    stdio::run(action_tx, token.clone()).await?;

    token.cancel();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(_) => {}
            Err(err) => log::error!("Task error: {}", err),
        }
    }

    Ok(())
}
