// cli.rs - Command-line interface configuration
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::DemoConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "refraction-demo")]
#[command(about = "Chromatic refraction demo (wgpu)", long_about = None)]
pub struct Cli {
    /// Hide the FPS readout and the refraction panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// JSON file overriding the default demo configuration
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Present without waiting for vertical sync
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "print-config", default_value = "false")]
    pub print_config: bool,
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides
    pub fn demo_config(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        if self.no_vsync {
            config.render.vsync = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::parse_from(["refraction-demo"]);
        assert!(!cli.no_ui);
        assert!(cli.config.is_none());
        assert_eq!((cli.width, cli.height), (1280, 720));
        assert!(!cli.no_vsync);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_from([
            "refraction-demo",
            "--no-ui",
            "--config",
            "scene.json",
            "--width",
            "640",
            "--height",
            "480",
            "--no-vsync",
            "--print-config",
        ]);
        assert!(cli.no_ui);
        assert_eq!(cli.config, Some(PathBuf::from("scene.json")));
        assert_eq!((cli.width, cli.height), (640, 480));
        assert!(cli.no_vsync);
        assert!(cli.print_config);
    }

    #[test]
    fn no_vsync_overrides_config() {
        let cli = Cli::parse_from(["refraction-demo", "--no-vsync"]);
        let config = cli.demo_config().unwrap();
        assert!(!config.render.vsync);
        assert_eq!(config.refraction, DemoConfig::default().refraction);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["refraction-demo", "--config", "/nonexistent/demo.json"]);
        let err = cli.demo_config().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/demo.json"));
    }
}
