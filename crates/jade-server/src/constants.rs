pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const SEARCH_FORM_TEMPLATE: &str = "include/search.html";
pub const BINARY_NAME: &str = env!("CARGO_BIN_NAME");

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 200;
