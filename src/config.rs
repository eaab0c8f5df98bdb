//! Configuration management
//! Load settings from .env file

use anyhow::Result;

/// Default remote True Positive List resource.
pub const DEFAULT_LIST_URL: &str =
    "https://raw.githubusercontent.com/forta-network/labelled-datasets/main/labels/1/true_positive_list.csv";

/// Default local fallback, relative to the working directory.
pub const DEFAULT_LIST_PATH: &str = "data/true_positive_list.csv";

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Remote CSV resource
    pub list_url: String,
    /// Local fallback file path
    pub list_path: String,
}

pub fn load_config() -> Result<LoaderConfig> {
    dotenv::dotenv().ok();

    Ok(LoaderConfig {
        list_url: std::env::var("TRUE_POSITIVE_LIST_URL")
            .unwrap_or_else(|_| DEFAULT_LIST_URL.to_string()),
        list_path: std::env::var("TRUE_POSITIVE_LIST_PATH")
            .unwrap_or_else(|_| DEFAULT_LIST_PATH.to_string()),
    })
}
