use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod geometry;
mod services;
mod utils;

use config::{Config, LoggingConfig};
use services::create_focus_service;

#[derive(Parser, Debug)]
#[command(name = "mouse-follows-focus")]
#[command(about = "Перемещает курсор мыши в центр окна, получившего фокус")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "mouse-follows-focus.toml")]
    config: String,

    /// Режим сухого запуска (эмулируемый рабочий стол, курсор не трогается)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (переопределяет конфигурацию)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_tracing(&config.logging, &config.filter_directive(args.log_level.as_deref()))?;

    info!("Запуск mouse-follows-focus v{}", env!("CARGO_PKG_VERSION"));

    // До любого запроса геометрии
    let awareness = utils::dpi::negotiate();
    info!("Режим DPI: {}", awareness);

    if args.dry_run {
        warn!("Режим сухого запуска - курсор не перемещается");
    }

    let service = create_focus_service(args.dry_run)?;

    tokio::select! {
        result = service.run() => {
            if let Err(e) = result {
                error!("Ошибка в цикле слежения за фокусом: {}", e);
                return Err(e.into());
            }
        }
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    }

    info!("mouse-follows-focus завершил работу");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, directive: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))?;

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
