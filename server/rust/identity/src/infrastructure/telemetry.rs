use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 環境名に応じた既定のログレベル。
pub fn default_level(env: &str) -> &'static str {
    match env {
        "dev" => "debug",
        "staging" => "info",
        _ => "warn",
    }
}

/// ログ出力を初期化する。`level` を指定すると環境名による既定値を上書きする。
/// `format` が "text" ならテキスト、それ以外は JSON で出力する。
pub fn init_logger(env: &str, format: &str, level: Option<&str>) {
    let filter = EnvFilter::new(level.unwrap_or_else(|| default_level(env)));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "text" {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .init();
    }
}
