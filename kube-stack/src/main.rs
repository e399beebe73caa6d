use clap::Parser;
use cli::{Commands, GlobalArgs, LogLevel};
use commands::{
    add_routes::add_routes, docker_env::docker_env, floating_ip::floating_ip,
    inventory::inventory, version::print_version,
};
use context::CloudContext;
use env_logger::Target;
use log::LevelFilter;

use crate::cli::Cli;

mod cli;
mod commands;
mod context;
mod output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    configure_logging(&cli.global_args);

    let settings = cli.global_args.settings.as_deref();

    match cli.command {
        Commands::Inventory(args) => inventory(args, CloudContext::load(settings)?).await?,
        Commands::FloatingIp(args) => floating_ip(args, CloudContext::load(settings)?).await?,
        Commands::DockerEnv(args) => docker_env(args, CloudContext::load(settings)?).await?,
        Commands::AddRoutes(args) => add_routes(args, CloudContext::load(settings)?).await?,
        Commands::Version => print_version(),
    }

    Ok(())
}

fn configure_logging(global_args: &GlobalArgs) {
    let log_level = global_args.get_log_level();
    let mut logger = env_logger::builder();

    logger
        .format_timestamp(None)
        .format_module_path(matches!(log_level, LogLevel::Trace))
        .format_target(false)
        .target(Target::Stderr);

    match log_level {
        LogLevel::Normal => logger.filter(Some("kube_stack"), LevelFilter::Info),
        LogLevel::Verbose => logger.filter(Some("kube_stack"), LevelFilter::Debug),
        LogLevel::Trace => logger.filter(None, LevelFilter::Debug),
    };

    logger.init();
}
