//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `goalpulse_core` linkage without a presentation layer.
//! - Optionally run every owner-level view over a JSON snapshot file.
//!
//! Usage: `goalpulse_cli [<snapshot.json> <owner_id> [YYYY-MM-DD]]`
//! Set `GOALPULSE_LOG_DIR` to an absolute path to enable file logging.

use chrono::{DateTime, NaiveDate, Utc};
use goalpulse_core::{EngineConfig, InMemoryGoalSource, ProgressService};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("goalpulse_core version={}", goalpulse_core::core_version());

    if let Ok(log_dir) = std::env::var("GOALPULSE_LOG_DIR") {
        if let Err(err) =
            goalpulse_core::init_logging(goalpulse_core::default_log_level(), &log_dir)
        {
            eprintln!("{err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, owner_id) = match args.as_slice() {
        [] => return ExitCode::SUCCESS,
        [path, owner_id, ..] => (path.as_str(), owner_id.as_str()),
        [_] => {
            eprintln!("usage: goalpulse_cli [<snapshot.json> <owner_id> [YYYY-MM-DD]]");
            return ExitCode::FAILURE;
        }
    };

    let config = EngineConfig::default();
    let today = match args.get(2) {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(day) => day,
            Err(err) => {
                eprintln!("invalid date `{raw}`: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => match local_today(&config, Utc::now()) {
            Ok(day) => day,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(path, owner_id, today, config) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    path: &str,
    owner_id: &str,
    today: NaiveDate,
    config: EngineConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let source = InMemoryGoalSource::from_json_file(path)?;
    let service = ProgressService::new(source, config)?;

    let daily = service.owner_daily_trend(owner_id, today)?;
    let monthly = service.owner_monthly_trend(owner_id, today)?;
    let topics = service.owner_topic_area(owner_id, today)?;

    let report = serde_json::json!({
        "daily": daily,
        "monthly": monthly,
        "topics": topics,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Calendar day of `now` in the engine's configured local offset.
fn local_today(
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<NaiveDate, goalpulse_core::ConfigError> {
    Ok(now.with_timezone(&config.local_offset()?).date_naive())
}

#[cfg(test)]
mod tests {
    use super::local_today;
    use chrono::{NaiveDate, TimeZone, Utc};
    use goalpulse_core::EngineConfig;

    #[test]
    fn local_today_follows_configured_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();

        let utc = EngineConfig::default();
        assert_eq!(
            local_today(&utc, now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        let tokyo = EngineConfig {
            utc_offset_minutes: 9 * 60,
            ..EngineConfig::default()
        };
        assert_eq!(
            local_today(&tokyo, now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }
}
