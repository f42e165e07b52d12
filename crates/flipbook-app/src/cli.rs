//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "flipbook",
    version,
    about = "Replay a Flipbook gesture script and render its playback"
)]
pub struct Cli {
    /// Gesture script (JSON).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Editor configuration (JSON). Defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output directory for frames and playback images.
    #[arg(long, value_name = "DIR", default_value = "flipbook-out")]
    pub out: PathBuf,

    /// Keep frame rasters in the user data directory instead of `<out>/frames`.
    #[arg(long)]
    pub persist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["flipbook", "demo.json", "--out", "render"]);
        assert_eq!(cli.script, PathBuf::from("demo.json"));
        assert_eq!(cli.out, PathBuf::from("render"));
        assert!(cli.config.is_none());
        assert!(!cli.persist);
    }

    #[test]
    fn test_default_out_dir() {
        let cli = Cli::parse_from(["flipbook", "demo.json", "--config", "cfg.json", "--persist"]);
        assert_eq!(cli.out, PathBuf::from("flipbook-out"));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
        assert!(cli.persist);
    }
}
