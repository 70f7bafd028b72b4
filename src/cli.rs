//! Command-line interface for partysim
//!
//! Runs either the default three-on-three battle or one described by a JSON
//! config file. Flags override values from the file.

use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::headless::HeadlessBattleConfig;

/// Real-time party auto-battle simulator
#[derive(Parser, Debug)]
#[command(name = "partysim")]
#[command(about = "Real-time party auto-battle simulator")]
#[command(version)]
pub struct Args {
    /// Run the battle described by the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum battle duration in simulated seconds
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible battle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Battle speed multiplier
    #[arg(long)]
    pub speed: Option<f32>,

    /// RON agent roster to use instead of the built-in one
    #[arg(long, value_name = "ROSTER_FILE")]
    pub roster: Option<PathBuf>,
}

impl Args {
    /// The battle config: from `--headless` if given, else the default battle,
    /// with command-line overrides applied and validated.
    pub fn battle_config(&self) -> Result<HeadlessBattleConfig> {
        let mut config = match &self.headless {
            Some(path) => HeadlessBattleConfig::load_from_file(path)?,
            None => HeadlessBattleConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_path = Some(output.display().to_string());
        }
        if let Some(max_duration) = self.max_duration {
            config.max_duration_secs = max_duration;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        if let Some(speed) = self.speed {
            config.battle_speed = speed;
        }
        if let Some(roster) = &self.roster {
            config.roster_path = Some(roster.display().to_string());
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::try_parse_from(["partysim"]).unwrap();
        let config = args.battle_config().unwrap();
        assert_eq!(config.player_party, vec!["Warrior", "Healer", "Mage"]);
        assert_eq!(config.max_duration_secs, 300.0);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "partysim",
            "--seed",
            "42",
            "--speed",
            "4",
            "--max-duration",
            "60",
            "--output",
            "out/log.json",
        ])
        .unwrap();
        let config = args.battle_config().unwrap();
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.battle_speed, 4.0);
        assert_eq!(config.max_duration_secs, 60.0);
        assert_eq!(config.output_path.as_deref(), Some("out/log.json"));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::try_parse_from(["partysim", "--speed", "0"]).unwrap();
        assert!(args.battle_config().is_err());
    }
}
