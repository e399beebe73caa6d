pub mod add_routes;
pub mod docker_env;
pub mod floating_ip;
pub mod inventory;
pub mod version;
