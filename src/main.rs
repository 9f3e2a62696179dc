use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecoindex_dialog::app::App;
use ecoindex_dialog::config::KeyResolver;
use ecoindex_dialog::{cli, config, theme};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting ecoindex-dialog");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    if let Some(code) = args.fail_with {
        config.analysis.fail_with = Some(code);
    }
    if let Some(duration) = args.duration {
        config.analysis.duration_secs = duration;
    }
    if let Some(theme) = args.theme {
        config.theme.name = theme;
    }

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let mut app = App::new(&config, resolver, theme);
    if let Some(url) = args.url {
        app.analyse_on_start(url);
    }
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("ecoindex-dialog").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "ecoindex-dialog.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
