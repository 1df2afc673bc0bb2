use crate::core::{JsonSource, RequestScope};
use crate::domain::model::{HealthStatus, HomeMessage};
use crate::utils::error::Result;
use serde_json::Value;

pub const HOME_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";

async fn fetch_cached<S>(source: &S, scope: &RequestScope, path: &str) -> Result<Value>
where
    S: JsonSource + ?Sized,
{
    let key = source.url_for(path);
    scope.memoize(&key, || source.get_json(path)).await
}

/// Root resource of the backend, fetched at most once per scope.
pub async fn get_home<S>(source: &S, scope: &RequestScope) -> Result<Value>
where
    S: JsonSource + ?Sized,
{
    fetch_cached(source, scope, HOME_PATH).await
}

pub async fn get_home_message<S>(source: &S, scope: &RequestScope) -> Result<HomeMessage>
where
    S: JsonSource + ?Sized,
{
    let value = get_home(source, scope).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn get_health<S>(source: &S, scope: &RequestScope) -> Result<HealthStatus>
where
    S: JsonSource + ?Sized,
{
    let value = fetch_cached(source, scope, HEALTH_PATH).await?;
    Ok(serde_json::from_value(value)?)
}
