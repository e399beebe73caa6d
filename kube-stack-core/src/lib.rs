pub mod credentials;
pub mod docker_env;
pub mod helpers;
pub mod inventory;
pub mod ip;
pub mod openstack;
pub mod routes;
pub mod settings;
