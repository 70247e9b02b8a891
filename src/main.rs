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

mod cli;
mod drivers;
mod errors;
mod http;
mod inventory;
mod util;

use std::process::ExitCode;

use slog::{o, Drain, Level};
use slog_scope::{debug, error, trace};

fn main() -> ExitCode {
    let config = match cli::parse_args(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            return ExitCode::from(2);
        }
    };

    // setup logging, stdout is reserved for the inventory
    let level = match config.verbosity() {
        0 => Level::Warning,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let (drain, _async_guard) = slog_async::Async::new(drain).build_with_guard();
    let drain = slog::LevelFilter::new(drain.fuse(), level).fuse();
    let log = slog::Logger::root(drain, o!());
    let _guard = slog_scope::set_global_logger(log);

    debug!("Logging initialized");
    trace!("cli configuration - {:?}", config);

    match config.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
