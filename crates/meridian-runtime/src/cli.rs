//! Command-line arguments

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use meridian_core::ClockResult;

use crate::{ClockConfig, LogFormat};

/// Meridian - a world clock of analog and seven-segment faces
#[derive(Debug, Parser)]
#[command(name = "meridian")]
#[command(version)]
#[command(about = "Render a world clock and serve it over HTTP")]
pub struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Zone to display (repeatable), e.g. `--zone Europe/Paris --zone EST`
    #[arg(short, long = "zone")]
    pub zones: Vec<String>,

    /// Address of the page server
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Show 24-hour digits
    #[arg(long)]
    pub use_24_hour: bool,

    /// Hide seconds digits and the seconds hand
    #[arg(long)]
    pub hide_seconds: bool,

    /// Blink the colons once per second
    #[arg(long)]
    pub pulsing: bool,

    /// Tick interval, e.g. `1s` or `500ms`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub tick: Option<Duration>,

    /// Log filter directive (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Render a single tick to stdout and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Configuration file (or defaults) with the flags applied on top
    pub fn config(&self) -> ClockResult<ClockConfig> {
        let mut config = match &self.config {
            Some(path) => ClockConfig::load(path)?,
            None => ClockConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut ClockConfig) {
        if !self.zones.is_empty() {
            config.zones = self.zones.clone();
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(tick) = self.tick {
            config.tick_interval = tick;
        }
        if self.use_24_hour {
            config.display.use_24_hour = true;
        }
        if self.hide_seconds {
            config.display.show_seconds = false;
        }
        if self.pulsing {
            config.display.pulsing = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "meridian",
            "--zone",
            "Europe/Paris",
            "-z",
            "est",
            "--use-24-hour",
            "--hide-seconds",
            "--tick",
            "250ms",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();

        let config = cli.config().unwrap();
        assert_eq!(config.zones, vec!["Europe/Paris", "est"]);
        assert!(config.display.use_24_hour);
        assert!(!config.display.show_seconds);
        assert!(!config.display.pulsing);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn test_no_flags_is_default_config() {
        let cli = Cli::try_parse_from(["meridian"]).unwrap();
        assert_eq!(cli.config().unwrap(), ClockConfig::default());
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["meridian", "--tick", "often"]).is_err());

        let cli = Cli::try_parse_from(["meridian", "--zone", "Middle/Earth"]).unwrap();
        assert!(cli.config().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["meridian", "--config", "/nonexistent/meridian.json"]).unwrap();
        assert!(matches!(cli.config(), Err(meridian_core::ClockError::Io(_))));
    }
}
