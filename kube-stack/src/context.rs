use std::path::{Path, PathBuf};

use anyhow::Context;
use kube_stack_core::{credentials::Credentials, openstack::Session, settings::Settings};
use log::debug;

pub struct CloudContext {
    settings_path: PathBuf,
    settings: Settings,
}

impl CloudContext {
    pub fn load(settings_path: Option<&Path>) -> anyhow::Result<Self> {
        let settings_path = Settings::resolve_path(settings_path);
        let settings = Settings::load(&settings_path).context("Couldn't load the settings!")?;

        Ok(Self {
            settings_path,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn connect(&self) -> anyhow::Result<Session> {
        debug!("Connecting with settings from {:?}", self.settings_path);

        let credentials = Credentials::from_env(&self.settings.os_cloud_profile)
            .context("Couldn't resolve OpenStack credentials!")?;

        Session::connect(&credentials, self.settings.request_timeout())
            .await
            .with_context(|| format!("Couldn't connect to {}!", credentials.auth_url))
    }
}
