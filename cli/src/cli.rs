use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "PopupTip",
    version = popuptip_core::version(),
    about = "PopupTip - shows short-lived message tips anchored to screen coordinates",
    allow_negative_numbers = true
)]
pub struct Args {
    /// Messages to show, each one replacing the previous tip
    #[arg(value_name = "MESSAGE", required_unless_present = "write_config")]
    pub messages: Vec<String>,

    /// Absolute X position of the tip
    #[arg(short = 'x', long = "x", default_value_t = 0)]
    pub x: i32,

    /// Absolute Y position of the tip
    #[arg(short = 'y', long = "y", default_value_t = 0)]
    pub y: i32,

    /// How long each tip stays visible, in milliseconds (defaults to the config value)
    #[arg(short = 'd', long = "duration-ms", value_name = "MS")]
    pub duration_ms: Option<u64>,

    /// Delay between successive messages, in milliseconds
    #[arg(long = "interval-ms", value_name = "MS", default_value_t = 500)]
    pub interval_ms: u64,

    /// Name of the component that owns the tip
    #[arg(long = "owner", default_value = "terminal")]
    pub owner: String,

    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults")]
    pub use_defaults: bool,

    /// Write the effective configuration to FILE
    #[arg(long = "write-config", value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Only log info and above
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including trace output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_messages_and_position() {
        let args = Args::try_parse_from(["popuptip", "-x", "-20", "--y", "40", "one", "two"]).unwrap();
        assert_eq!(args.messages, vec!["one", "two"]);
        assert_eq!(args.x, -20);
        assert_eq!(args.y, 40);
        assert_eq!(args.duration_ms, None);
        assert_eq!(args.interval_ms, 500);
        assert_eq!(args.owner, "terminal");
    }

    #[test]
    fn test_message_required_without_write_config() {
        assert!(Args::try_parse_from(["popuptip"]).is_err());
        let args = Args::try_parse_from(["popuptip", "--write-config", "out.yaml"]).unwrap();
        assert!(args.messages.is_empty());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["popuptip", "-q", "-v", "hi"]).is_err());
    }
}
