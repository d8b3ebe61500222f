use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::utils::logging::{init_logging, LogFormat};

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG and config overrides apply
    dotenv().ok();

    let (cfg, cfg_err) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(e) => (configs::AppConfig::default(), Some(e)),
    };
    init_logging(LogFormat::parse(&cfg.logging.format));
    if let Some(e) = cfg_err {
        error!(service = "server", event = "config_invalid", error = %e, "configuration rejected");
        return std::process::ExitCode::FAILURE;
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "server service starting"
    );

    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
