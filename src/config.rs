use std::net::SocketAddr;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen: SocketAddr,
    pub db_max_connections: u32,
}
