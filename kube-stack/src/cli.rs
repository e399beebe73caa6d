use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kube_stack_core::docker_env::DEFAULT_DOCKER_TLS_PORT;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// settings file to use (defaults to $SETTINGS_FILE, then ./settings.yaml)
    #[arg(short = 's', long, global = true)]
    pub settings: Option<PathBuf>,
    /// enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose_logging: bool,
    /// enable trace output (more detailed than verbose, overrides it if present)
    #[arg(long = "trace", global = true)]
    pub trace_logging: bool,
}

impl GlobalArgs {
    pub fn get_log_level(&self) -> LogLevel {
        if self.trace_logging {
            return LogLevel::Trace;
        }

        if self.verbose_logging {
            return LogLevel::Verbose;
        }

        LogLevel::Normal
    }
}

pub enum LogLevel {
    Normal,
    Verbose,
    Trace,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// print an Ansible dynamic inventory of servers grouped by their metadata
    #[command(alias = "i")]
    Inventory(InventoryArgs),
    /// print the floating IP of a server
    #[command(alias = "ip")]
    FloatingIp(FloatingIpArgs),
    /// write a <server>.env file pointing the Docker client at the server
    #[command(alias = "d")]
    DockerEnv(DockerEnvArgs),
    /// route every node's pod CIDR through the tenant router to that node
    #[command(alias = "r")]
    AddRoutes(AddRoutesArgs),
    /// print the version of kube-stack
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value()]
pub enum OutputFormat {
    /// names only
    #[value(name = "names")]
    Names,
    /// human-readable table
    #[value(name = "table")]
    Table,
    /// human-readable table with headers
    #[value(name = "table-with-headers")]
    TableWithHeaders,
    /// JSON
    #[value(name = "json")]
    Json,
    /// pretty-printed JSON
    #[value(name = "json-pretty")]
    JsonPretty,
    /// YAML
    #[value(name = "yaml")]
    Yaml,
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// print the whole inventory (the default, accepted for Ansible compatibility)
    #[arg(long, conflicts_with = "host")]
    pub list: bool,
    /// print only the variables of the given host
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Debug, Args)]
pub struct FloatingIpArgs {
    /// name of the server
    pub server: String,
    /// network to take the floating IP from (defaults to os_network_name from the settings)
    #[arg(long)]
    pub network: Option<String>,
}

#[derive(Debug, Args)]
pub struct DockerEnvArgs {
    /// name of the server
    pub server: String,
    /// network to take the floating IP from (defaults to os_network_name from the settings)
    #[arg(long)]
    pub network: Option<String>,
    /// directory the env file is written to
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,
    /// port the Docker daemon listens on
    #[arg(long, default_value_t = DEFAULT_DOCKER_TLS_PORT)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct AddRoutesArgs {
    /// compute and print the route table without updating the router
    #[arg(long)]
    pub dry_run: bool,
    /// output format of the computed route table
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::TableWithHeaders)]
    pub output: OutputFormat,
}
