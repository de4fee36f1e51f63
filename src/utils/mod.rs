// 通用工具模块

use log::LevelFilter;

/// 默认 llama-server 地址
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// 读取推理服务地址，环境变量 CHUTI_SERVER_URL 优先
pub fn server_url_from_env() -> String {
    std::env::var("CHUTI_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

/// 初始化 fern 日志输出
pub fn setup_logging(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
