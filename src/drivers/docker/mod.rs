// Copyright 2026 The ansible-inventory-drivers Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Docker Machine driver.
//!
//! Every machine known to the local `docker-machine` tool becomes a group
//! holding the machine's IP address, with SSH connection variables taken
//! from `docker-machine inspect`.

use std::time::Duration;

use slog_scope::{debug, trace};

use crate::drivers::InventoryDriver;
use crate::errors::*;
use crate::inventory::{Group, Inventory};
use crate::util;

const IP_ADDRESS: &str = "{{.Driver.IPAddress}}";
const SSH_USER: &str = "{{.Driver.SSHUser}}";
const SSH_PORT: &str = "{{.Driver.SSHPort}}";
const SSH_KEY_PATH: &str = "{{.Driver.SSHKeyPath}}";

const PYTHON_INTERPRETER: &str = "/usr/bin/python2";

/// Runs `docker-machine` sub-commands, returning trimmed standard output.
pub trait MachineCli {
    fn run(&self, args: &[&str]) -> Result<String>;
}

/// The real `docker-machine` binary.
#[derive(Clone, Debug)]
pub struct DockerMachine {
    binary: String,
    timeout: Duration,
}

impl MachineCli for DockerMachine {
    fn run(&self, args: &[&str]) -> Result<String> {
        util::run_with_timeout(&self.binary, args, self.timeout)
    }
}

#[derive(Clone, Debug)]
pub struct DockerDriver<C = DockerMachine> {
    cli: C,
}

impl DockerDriver {
    pub fn new(binary: &str, timeout: Duration) -> Self {
        DockerDriver {
            cli: DockerMachine {
                binary: binary.to_string(),
                timeout,
            },
        }
    }
}

impl<C: MachineCli> DockerDriver<C> {
    /// Names of all machines, one per line of `ls -q`.
    fn machines(&self) -> Result<Vec<String>> {
        let out = self.cli.run(&["ls", "-q"])?;
        let machines: Vec<String> = out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        trace!("machines - {:?}", machines);
        Ok(machines)
    }

    fn inspect(&self, machine: &str, template: &str) -> Result<String> {
        self.cli.run(&["inspect", "-f", template, machine])
    }

    fn node(&self, machine: &str) -> Result<Group> {
        let ip = self.inspect(machine, IP_ADDRESS)?;
        let user = self.inspect(machine, SSH_USER)?;
        let port = self.inspect(machine, SSH_PORT)?;
        let key = self.inspect(machine, SSH_KEY_PATH)?;

        let port: i64 = port.parse().map_err(|_| Error::Subprocess {
            command: format!("docker-machine inspect -f {SSH_PORT} {machine}"),
            reason: format!("invalid SSH port '{port}'"),
        })?;

        Ok(Group::new(vec![ip])
            .var("ansible_python_interpreter", PYTHON_INTERPRETER)
            .var("ansible_ssh_user", user)
            .var("ansible_ssh_port", port)
            .var("ansible_ssh_private_key_file", key))
    }
}

impl<C: MachineCli> InventoryDriver for DockerDriver<C> {
    fn collect(&self) -> Result<Inventory> {
        let mut inv = Inventory::new();
        for machine in self.machines()? {
            debug!("inspecting machine '{}'", machine);
            let group = self.node(&machine)?;
            inv.add_group(machine, group);
        }
        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::inventory::{Scalar, LOCAL_GROUP};

    /// Answers from canned output, keyed by the joined arguments.
    struct FakeCli(HashMap<String, String>);

    impl MachineCli for FakeCli {
        fn run(&self, args: &[&str]) -> Result<String> {
            let key = args.join(" ");
            self.0
                .get(&key)
                .map(|out| out.trim().to_string())
                .ok_or_else(|| Error::Subprocess {
                    command: format!("docker-machine {key}"),
                    reason: "exit status: 1".to_string(),
                })
        }
    }

    fn machine_outputs(name: &str, ip: &str, port: &str) -> Vec<(String, String)> {
        vec![
            (format!("inspect -f {IP_ADDRESS} {name}"), format!("{ip}\n")),
            (format!("inspect -f {SSH_USER} {name}"), "docker\n".to_string()),
            (format!("inspect -f {SSH_PORT} {name}"), format!("{port}\n")),
            (
                format!("inspect -f {SSH_KEY_PATH} {name}"),
                format!("/home/core/.docker/machine/machines/{name}/id_rsa\n"),
            ),
        ]
    }

    fn driver(outputs: Vec<(String, String)>) -> DockerDriver<FakeCli> {
        DockerDriver {
            cli: FakeCli(outputs.into_iter().collect()),
        }
    }

    #[test]
    fn test_single_machine() {
        let mut outputs = vec![("ls -q".to_string(), "m1\n".to_string())];
        outputs.extend(machine_outputs("m1", "192.168.99.100", "22"));

        let inv = driver(outputs).collect().unwrap();
        assert_eq!(inv.groups().len(), 2);
        inv.group(LOCAL_GROUP).unwrap();

        let m1 = inv.group("m1").unwrap();
        assert_eq!(m1.hosts, vec!["192.168.99.100".to_string()]);
        let expected = maplit::btreemap! {
            "ansible_python_interpreter".to_string() => Scalar::from("/usr/bin/python2"),
            "ansible_ssh_user".to_string() => Scalar::from("docker"),
            "ansible_ssh_port".to_string() => Scalar::Int(22),
            "ansible_ssh_private_key_file".to_string() =>
                Scalar::from("/home/core/.docker/machine/machines/m1/id_rsa"),
        };
        assert_eq!(m1.vars, expected);
    }

    #[test]
    fn test_multiple_machines() {
        let mut outputs = vec![("ls -q".to_string(), "m1\n\nm2\n".to_string())];
        outputs.extend(machine_outputs("m1", "192.168.99.100", "22"));
        outputs.extend(machine_outputs("m2", "192.168.99.101", "2222"));

        let inv = driver(outputs).collect().unwrap();
        assert_eq!(inv.groups().len(), 3);
        let m2 = inv.group("m2").unwrap();
        assert_eq!(m2.hosts, vec!["192.168.99.101".to_string()]);
        assert_eq!(m2.vars["ansible_ssh_port"], Scalar::Int(2222));
    }

    #[test]
    fn test_no_machines() {
        let inv = driver(vec![("ls -q".to_string(), String::new())])
            .collect()
            .unwrap();
        assert_eq!(inv.groups().len(), 1);
    }

    #[test]
    fn test_failing_inspect() {
        let outputs = vec![("ls -q".to_string(), "m1\n".to_string())];
        assert!(matches!(
            driver(outputs).collect(),
            Err(Error::Subprocess { .. })
        ));
    }

    #[test]
    fn test_invalid_port() {
        let mut outputs = vec![("ls -q".to_string(), "m1\n".to_string())];
        outputs.extend(machine_outputs("m1", "192.168.99.100", "<no value>"));
        match driver(outputs).collect() {
            Err(Error::Subprocess { reason, .. }) => assert!(reason.contains("<no value>")),
            x => panic!("unexpected result: {x:?}"),
        }
    }

    #[test]
    fn test_missing_binary() {
        let driver = DockerDriver::new(
            "docker-machine-binary-that-does-not-exist",
            Duration::from_secs(1),
        );
        assert!(matches!(
            driver.collect(),
            Err(Error::DependencyUnavailable(_))
        ));
    }
}
