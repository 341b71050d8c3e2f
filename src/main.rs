mod cli;

use anyhow::Context;
use bridge_desktop::FileLoggerSink;
use clap::Parser;
use cli::{Cli, Command};
use core_runtime::config::RunConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let sink = FileLoggerSink::with_min_level(&cli.log_file, cli.log_level)
        .with_context(|| format!("cannot open log file {}", cli.log_file.display()))?;
    let _logging = init_logging(
        LoggingConfig::default()
            .with_format(cli.log_format)
            .with_level(cli.log_level)
            .with_logger_sink(Arc::new(sink)),
    )?;

    let vk_token = cli
        .vk_token
        .clone()
        .context("a VK access token is required (--vk-token or VK_TOKEN)")?;
    let service = core_service::bootstrap_desktop()?;

    match cli.command {
        Command::Albums { user_id } => {
            if let Err(e) = service
                .list_albums(&user_id, &vk_token, &cli.api_version)
                .await
            {
                debug!(error = %e, "Album listing failed");
            }
        }
        Command::Backup {
            user_id,
            album_id,
            yandex_token,
            count,
            manifest,
            client_secrets,
            token_cache,
            auth_timeout,
        } => {
            let config = RunConfig::builder()
                .source_user_id(user_id)
                .album_id(album_id)
                .source_token(vk_token)
                .destination_token(yandex_token)
                .photo_count(count)
                .api_version(cli.api_version)
                .manifest_path(manifest)
                .client_secrets_path(client_secrets)
                .token_cache_path(token_cache)
                .build()?;

            let summary = service
                .with_auth_timeout(Duration::from_secs(auth_timeout))
                .run(&config)
                .await;
            println!("{}", summary);
        }
    }

    Ok(())
}
