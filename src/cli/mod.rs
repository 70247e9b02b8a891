//! Command-line arguments parsing.
//!
//! The `--list` and `--host` flags belong to Ansible's dynamic inventory
//! calling convention. They are accepted so Ansible can invoke us, but the
//! full inventory is printed either way.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use slog_scope::debug;

use crate::drivers::{CmdbConfig, DriverConfig, Registry};

/// Driver used when neither `--driver` nor `INVENTORY_DRIVER` are set.
const DEFAULT_DRIVER: &str = "docker";

/// Produce an Ansible inventory from one of several backends
#[derive(Debug, Parser)]
#[command(name = "inventory", version)]
pub(crate) struct CliConfig {
    /// Which driver to use
    #[arg(short, long, value_name = "name", env = "INVENTORY_DRIVER", default_value = DEFAULT_DRIVER)]
    driver: String,
    /// List all groups and hosts as an Ansible inventory
    #[arg(short, long)]
    list: bool,
    /// Ansible inventory of a particular host
    #[arg(long, value_name = "hostname")]
    host: Option<String>,
    /// Protocol used to reach the inventory API
    #[arg(long, value_name = "scheme", env = "INVENTORY_CMDB_PROTOCOL", default_value = "http")]
    cmdb_protocol: String,
    /// Inventory API server, skips DNS SRV discovery
    #[arg(long, value_name = "host[:port]", env = "INVENTORY_CMDB_SERVER")]
    cmdb_server: Option<String>,
    /// Path prefix of the inventory API
    #[arg(long, value_name = "path", env = "INVENTORY_CMDB_API", default_value = "api/v1")]
    cmdb_api: String,
    /// Domain searched for the inventory API SRV record
    #[arg(long, value_name = "domain", env = "INVENTORY_CMDB_DOMAIN", default_value = "local")]
    cmdb_domain: String,
    /// User-Agent sent to the inventory API
    #[arg(
        long,
        value_name = "agent",
        env = "INVENTORY_CMDB_USER_AGENT",
        default_value = "AnsibleInventory/0.0.1 (ansible 2.2.1.0)"
    )]
    cmdb_user_agent: String,
    /// Path to the docker-machine binary
    #[arg(long, value_name = "path", env = "INVENTORY_DOCKER_MACHINE", default_value = "docker-machine")]
    docker_machine: String,
    /// Timeout in seconds for each backend call
    #[arg(long, value_name = "secs", env = "INVENTORY_TIMEOUT", default_value_t = 30)]
    timeout: u64,
    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl CliConfig {
    /// Logging verbosity requested on the command line.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            cmdb: CmdbConfig {
                protocol: self.cmdb_protocol.clone(),
                server: self.cmdb_server.clone(),
                api: self.cmdb_api.clone(),
                domain: self.cmdb_domain.clone(),
                user_agent: self.cmdb_user_agent.clone(),
            },
            docker_machine: self.docker_machine.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Collect the inventory with the selected driver and print it to stdout.
    pub fn run(self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&Registry::builtin(), &mut stdout.lock())
    }

    fn run_with(&self, registry: &Registry, out: &mut impl Write) -> Result<()> {
        debug!(
            "inventory request - list: {}, host: {:?}",
            self.list, self.host
        );

        let inventory = registry
            .collect(&self.driver, &self.driver_config())
            .with_context(|| format!("collecting inventory with driver '{}'", self.driver))?;
        let rendered = inventory.to_json().context("rendering inventory")?;

        writeln!(out, "{rendered}").context("writing inventory")?;
        out.flush().context("writing inventory")?;
        Ok(())
    }
}

/// Parse command-line arguments into CLI configuration.
pub(crate) fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<CliConfig> {
    let cfg = match CliConfig::try_parse_from(argv) {
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => e.exit(),
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayVersion => e.exit(),
        v => v,
    }?;
    Ok(cfg)
}
