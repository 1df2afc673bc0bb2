use crate::utils::error::Result;
use async_trait::async_trait;

/// Something that can answer `GET {base}/{path}` with a JSON body.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Absolute URL requested for `path`. Doubles as the memoization key.
    fn url_for(&self, path: &str) -> String;

    async fn get_json(&self, path: &str) -> Result<serde_json::Value>;
}

pub trait ConfigProvider: Send + Sync {
    /// Configured backend base URL, if any source provided one.
    fn api_base_url(&self) -> Option<&str>;
}
