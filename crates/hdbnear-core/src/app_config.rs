use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Service-account login used to mint geocoding tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct OneMapCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for OneMapCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneMapCredentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Dataset identifiers on data.gov.sg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIds {
    /// Datastore resource id for HDB resale transactions.
    pub resale: String,
    /// Datastore resource id for general school information.
    pub schools: String,
    /// Poll-download dataset id for the eldercare services GeoJSON.
    pub eldercare: String,
    /// Poll-download dataset id for the MRT station exits GeoJSON.
    pub transit_exits: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub onemap_base_url: String,
    pub onemap_credentials: Option<OneMapCredentials>,
    pub onemap_token: Option<String>,
    pub datagov_base_url: String,
    pub datagov_download_base_url: String,
    pub datasets: DatasetIds,
    pub search_radius_km: f64,
    pub max_concurrency: usize,
    pub geocode_timeout_secs: u64,
    pub dataset_timeout_secs: u64,
    pub resale_months: usize,
    pub page_limit: u32,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("onemap_base_url", &self.onemap_base_url)
            .field("onemap_credentials", &self.onemap_credentials)
            .field(
                "onemap_token",
                &self.onemap_token.as_ref().map(|_| "[redacted]"),
            )
            .field("datagov_base_url", &self.datagov_base_url)
            .field("datagov_download_base_url", &self.datagov_download_base_url)
            .field("datasets", &self.datasets)
            .field("search_radius_km", &self.search_radius_km)
            .field("max_concurrency", &self.max_concurrency)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("dataset_timeout_secs", &self.dataset_timeout_secs)
            .field("resale_months", &self.resale_months)
            .field("page_limit", &self.page_limit)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
