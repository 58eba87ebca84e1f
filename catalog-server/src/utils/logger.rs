//! Logging Infrastructure
//!
//! Console logging plus optional daily rotating files:
//! - `app/`: application logs, deleted after 14 days
//! - `audit/`: admin catalog mutations (target "audit"), never deleted

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Default filter when RUST_LOG is unset
pub const DEFAULT_FILTER: &str = "catalog_server=info,tower_http=info";

/// Delete `app-YYYY-MM-DD.log` files older than the retention window
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date_part) = name.strip_prefix("app.").or_else(|| name.strip_prefix("app-"))
        else {
            continue;
        };
        let date_part = date_part.strip_suffix(".log").unwrap_or(date_part);
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Initialize the logging system
///
/// `RUST_LOG` overrides `filter`. With `log_dir`, logs are also written to
/// daily rotating files under it.
pub fn init_logger_with_file(
    filter: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_filter(env_filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter())
            .boxed()
    };

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join("app");
    let audit_log_dir = log_dir.join("audit");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let app_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(env_filter())
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "audit"
        }));

    let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
    let audit_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(audit_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "audit"
        }));

    tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(app_layer)
        .with(audit_layer)
        .init();

    Ok(())
}

/// Runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Audit log helper for admin catalog mutations
///
/// ```ignore
/// audit_log!(user.username, "delete", "product:42");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user = %$user,
            action = $action,
            resource = %$resource,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let old = app.join("app.2020-01-01");
        let today = app.join(format!("app.{}", chrono::Local::now().format("%Y-%m-%d")));
        let other = app.join("notes.txt");
        for path in [&old, &today, &other] {
            fs::write(path, "x").unwrap();
        }

        cleanup_old_logs(dir.path()).unwrap();
        assert!(!old.exists());
        assert!(today.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_cleanup_without_app_dir() {
        let dir = tempfile::tempdir().unwrap();
        cleanup_old_logs(dir.path()).unwrap();
    }
}
