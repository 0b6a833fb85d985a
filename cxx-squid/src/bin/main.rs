// SPDX-License-Identifier: GPL-3.0-or-later

use cxx_squid::{application, args, config, context};
use std::process::ExitCode;

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Parse the command line arguments first, the verbosity selects the log level.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;

    // Initialize the logging system, the environment overrides the flags.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(arguments.log_level())).init();
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");

    // Capture application context.
    let context = context::Context::capture()?;
    log::info!("{context}");
    log::info!("{arguments}");
    // Load the configuration.
    let configuration = config::Loader::load(&context, &arguments.config)?;
    log::info!("{configuration}");

    let application = application::Application::configure(&context, arguments, configuration)?;
    log::debug!("Configuration complete, reading the inputs now...");
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}
