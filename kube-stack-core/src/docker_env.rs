use std::{
    fmt::{Display, Formatter},
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use log::info;
use thiserror::Error;

pub const DEFAULT_DOCKER_TLS_PORT: u16 = 2376;
pub const DOCKER_CERT_PATH_ENV_VAR: &str = "DOCKER_CERT_PATH";
pub const ENV_FILE_EXTENSION: &str = "env";

#[derive(Debug, Error)]
pub enum DockerEnvError {
    #[error("'{}' can't be used as an env file name!", .0)]
    InvalidServerName(String),
    #[error("Couldn't write {}: {}", .0.display(), .1)]
    IoError(PathBuf, std::io::Error),
}

/// Shell exports pointing the Docker client at a remote daemon over TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerEnv {
    pub host: String,
    pub port: u16,
    pub cert_path: Option<String>,
}

impl DockerEnv {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_DOCKER_TLS_PORT,
            cert_path: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cert_path(mut self, cert_path: Option<String>) -> Self {
        self.cert_path = cert_path.filter(|path| !path.is_empty());
        self
    }

    /// Writes `<server_name>.env` into `directory` and returns its path.
    pub fn write_for_server(
        &self,
        directory: &Path,
        server_name: &str,
    ) -> Result<PathBuf, DockerEnvError> {
        let path = env_file_path(directory, server_name)?;

        fs::write(&path, self.to_string())
            .map_err(|err| DockerEnvError::IoError(path.clone(), err))?;

        info!("Docker environment for '{server_name}' written to {}", path.display());

        Ok(path)
    }
}

impl Display for DockerEnv {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => writeln!(f, "export DOCKER_HOST=tcp://{}", SocketAddr::new(ip, self.port))?,
            Err(_) => writeln!(f, "export DOCKER_HOST=tcp://{}:{}", self.host, self.port)?,
        }
        writeln!(f, "export DOCKER_TLS_VERIFY=1")?;

        if let Some(cert_path) = &self.cert_path {
            writeln!(f, "export {DOCKER_CERT_PATH_ENV_VAR}={cert_path}")?;
        }

        Ok(())
    }
}

fn env_file_path(directory: &Path, server_name: &str) -> Result<PathBuf, DockerEnvError> {
    let file_name = server_name.trim();

    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(std::path::is_separator)
    {
        return Err(DockerEnvError::InvalidServerName(server_name.to_owned()));
    }

    Ok(directory.join(format!("{file_name}.{ENV_FILE_EXTENSION}")))
}
