use clap::{ArgAction, Parser};

use crate::{error::Error, policy::PolicyKind, programs::Program};

pub const DEFAULT_DISK_NAME: &str = "myvirtualdisk";

#[derive(Debug, Clone, Parser)]
#[command(name = "virtmem")]
#[command(about = "Demand-paged virtual memory simulator")]
#[command(version)]
pub struct Config {
    /// Number of virtual pages
    pub pages: usize,

    /// Number of physical frames
    pub frames: usize,

    /// Page replacement policy
    #[arg(value_enum)]
    pub policy: PolicyKind,

    /// Workload to run
    #[arg(value_enum)]
    pub program: Program,

    /// Seed for the random policy and the workloads
    #[arg(long)]
    pub seed: Option<u64>,

    /// Name of the backing store image
    #[arg(long, default_value = DEFAULT_DISK_NAME)]
    pub disk: String,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn new(pages: usize, frames: usize, policy: PolicyKind, program: Program) -> Self {
        Self {
            pages,
            frames,
            policy,
            program,
            seed: None,
            disk: String::from(DEFAULT_DISK_NAME),
            verbose: 0,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.pages == 0 {
            return Err(Error::Configuration(String::from(
                "page count must be positive",
            )));
        }
        if self.frames == 0 {
            return Err(Error::Configuration(String::from(
                "frame count must be positive",
            )));
        }
        if self.pages > u32::MAX as usize || self.frames > u32::MAX as usize {
            return Err(Error::Configuration(format!(
                "page and frame counts must fit in 32 bits (got {} pages, {} frames)",
                self.pages, self.frames
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let config = Config::try_parse_from(["virtmem", "100", "10", "custom", "beta"]).unwrap();
        assert_eq!(config.pages, 100);
        assert_eq!(config.frames, 10);
        assert_eq!(config.policy, PolicyKind::TwoPassClock);
        assert_eq!(config.program, Program::Beta);
        assert_eq!(config.seed, None);
        assert_eq!(config.disk, DEFAULT_DISK_NAME);
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn parses_options() {
        let config = Config::try_parse_from([
            "virtmem", "8", "4", "rand", "delta", "--seed", "17", "--disk", "scratch", "-vv",
        ])
        .unwrap();
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.disk, "scratch");
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(Config::try_parse_from(["virtmem", "8", "4", "clock"]).is_err());
        assert!(Config::try_parse_from(["virtmem", "8", "4", "clock", "alpha", "extra"]).is_err());
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(Config::try_parse_from(["virtmem", "8", "4", "lru", "alpha"]).is_err());
        assert!(Config::try_parse_from(["virtmem", "8", "4", "clock", "omega"]).is_err());
    }

    #[test]
    fn validate_rejects_zero_sizes() {
        let config = Config::new(0, 4, PolicyKind::Clock, Program::Alpha);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
        let config = Config::new(4, 0, PolicyKind::Clock, Program::Alpha);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
        let config = Config::new(4, 8, PolicyKind::Clock, Program::Alpha);
        assert!(config.validate().is_ok());
    }
}
