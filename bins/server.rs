use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG、CONFIG_PATH、SERVER_* 等环境变量生效
    dotenv().ok();

    // 读取配置（优先 config.toml，文件不存在时回落到环境变量）
    let cfg = match configs::AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // 配置无效时仍需要日志输出错误原因
            common::utils::logging::init_logging_default();
            error!(service = "movie-api", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    // 按配置选择 compact 或 json 日志格式
    common::utils::logging::init_logging(&cfg.logging.format);
    info!(service = "movie-api", event = "logger_init", format = %cfg.logging.format, "tracing subscriber initialized");

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "movie-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // 构建 Tokio 运行时（线程数来自配置，normalize 后至少为 1）
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "movie-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 服务启动事件
    info!(
        service = "movie-api",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "movie api starting"
    );

    rt.block_on(async move {
        // Ctrl+C 触发优雅停机；信号监听失败时服务继续运行
        match server::run(cfg, server::startup::ctrl_c_shutdown()).await {
            Ok(()) => {
                info!(service = "movie-api", event = "stop", %service_id, pid, "movie api stopped");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                // 绑定失败、种子数据无效等均在此处结束进程
                error!(service = "movie-api", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
