//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hue_lights_rs::Category;

#[derive(Debug, Parser)]
#[command(
    name = "hue",
    version,
    about = "Control Philips Hue lights from the command line"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Address of the Hue bridge; defaults to the first registered bridge
    #[arg(long, env = "HUE_HOST", global = true)]
    pub host: Option<String>,

    /// Path to the file holding registered usernames
    #[arg(long, env = "HUE_CONFIG_FILE", global = true)]
    pub config_file_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    pub timeout: f64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List lights, groups, scenes or sensors
    #[command(alias = "ls")]
    List {
        #[arg(value_enum, default_value = "light")]
        kind: Kind,
    },

    /// Show an entity, or one of its attributes, as JSON
    Get {
        #[arg(value_enum)]
        kind: Kind,
        /// Id or name
        target: String,
        attribute: Option<String>,
    },

    /// Change the state of a light or a group
    Set(SetArgs),

    /// Register with the bridge; press its link button first
    Register,

    /// Show bridge info and session diagnostics
    #[command(alias = "diagnostics")]
    Diag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    #[value(alias = "lights")]
    Light,
    #[value(alias = "groups")]
    Group,
    #[value(alias = "scenes")]
    Scene,
    #[value(alias = "sensors")]
    Sensor,
}

impl Kind {
    pub fn category(self) -> Category {
        match self {
            Kind::Light => Category::Lights,
            Kind::Group => Category::Groups,
            Kind::Scene => Category::Scenes,
            Kind::Sensor => Category::Sensors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetKind {
    #[value(alias = "lights")]
    Light,
    #[value(alias = "groups")]
    Group,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(value_enum)]
    pub kind: SetKind,

    /// Id or name
    pub target: String,

    /// Turn on
    #[arg(long, conflicts_with = "off")]
    pub on: bool,

    /// Turn off
    #[arg(long)]
    pub off: bool,

    /// Brightness (1-254)
    #[arg(long)]
    pub bri: Option<u8>,

    /// Hue (0-65535)
    #[arg(long)]
    pub hue: Option<u16>,

    /// Saturation (0-254)
    #[arg(long)]
    pub sat: Option<u8>,

    /// Color temperature in mireds (153-500)
    #[arg(long)]
    pub ct: Option<u16>,

    /// Transition time in deciseconds
    #[arg(long)]
    pub transition: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults_to_lights() {
        let cli = Cli::try_parse_from(["hue", "ls"]).unwrap();
        assert!(matches!(cli.command, Command::List { kind: Kind::Light }));
    }

    #[test]
    fn test_plural_alias() {
        let cli = Cli::try_parse_from(["hue", "list", "scenes"]).unwrap();
        assert!(matches!(cli.command, Command::List { kind: Kind::Scene }));
    }

    #[test]
    fn test_set_flags() {
        let cli = Cli::try_parse_from([
            "hue", "--host", "10.0.0.2", "set", "group", "Kitchen", "--on", "--bri", "100",
        ])
        .unwrap();
        assert_eq!(cli.global.host.as_deref(), Some("10.0.0.2"));
        let Command::Set(args) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.kind, SetKind::Group);
        assert!(args.on);
        assert_eq!(args.bri, Some(100));
    }

    #[test]
    fn test_on_conflicts_with_off() {
        assert!(Cli::try_parse_from(["hue", "set", "light", "1", "--on", "--off"]).is_err());
    }
}
