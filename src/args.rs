//! CLI argument definitions for the loader.

use crate::config::Config;
use clap::Args;
use std::path::PathBuf;

/// Arguments of a load run.
#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// Path to YAML configuration file
    #[arg(long, short = 'c', env = "FFV_LOADER_CONFIG")]
    pub config: PathBuf,

    /// Number of pairs to generate (overrides generator.n)
    #[arg(long)]
    pub row_count: Option<u64>,

    /// Pairs per insert transaction (overrides generator.in_iter)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Random seed for deterministic generation (overrides generator.seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// ClickHouse connection string (replaces the storage section's address,
    /// credentials, database and timeouts)
    #[arg(long, env = "CLICKHOUSE_DSN")]
    pub dsn: Option<String>,

    /// Dry-run mode: validate configuration and print the batch plan without
    /// connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl LoadArgs {
    /// Apply command-line overrides to a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(row_count) = self.row_count {
            config.generator.n = row_count;
        }
        if let Some(batch_size) = self.batch_size {
            config.generator.in_iter = batch_size;
        }
        if self.seed.is_some() {
            config.generator.seed = self.seed;
        }
    }

    /// Connection string to use: `--dsn` if given, else built from `config`.
    pub fn dsn(&self, config: &Config) -> String {
        self.dsn
            .clone()
            .unwrap_or_else(|| config.storage.connection_target().dsn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: LoadArgs,
    }

    fn config() -> Config {
        Config::from_yaml(
            r#"
storage:
  addr: localhost
  port: 8123
  user: default
  max_pings: 1
  default_db: biometrics
  write_timeout_ms: 0
  read_timeout_ms: 0
generator:
  n: 100
  in_iter: 10
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_overrides_apply() {
        let cli = TestCli::parse_from([
            "ffv-loader",
            "--config",
            "loader.yaml",
            "--row-count",
            "7",
            "--batch-size",
            "2",
            "--seed",
            "99",
        ]);
        let mut config = config();

        cli.args.apply(&mut config);

        assert_eq!(config.generator.n, 7);
        assert_eq!(config.generator.in_iter, 2);
        assert_eq!(config.generator.seed, Some(99));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = TestCli::parse_from(["ffv-loader", "-c", "loader.yaml"]);
        let mut config = config();

        cli.args.apply(&mut config);

        assert_eq!(config, self::config());
        assert!(cli.args.dsn(&config).starts_with("http://localhost:8123?"));
    }

    #[test]
    fn test_dsn_override() {
        let cli = TestCli::parse_from([
            "ffv-loader",
            "-c",
            "loader.yaml",
            "--dsn",
            "http://ch:8123?database=other",
        ]);

        assert_eq!(cli.args.dsn(&config()), "http://ch:8123?database=other");
    }
}
