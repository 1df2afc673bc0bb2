use clap::Parser;
use jarvis_web::config::Resource;
use jarvis_web::utils::{logger, validation::Validate};
use jarvis_web::{get_health, get_home, ApiClient, ApiError, AppConfig, CliConfig, RequestScope};

const EXIT_CONFIG: i32 = 1;
const EXIT_FETCH: i32 = 2;

fn exit_code(e: &ApiError) -> i32 {
    if e.is_config_error() || matches!(e, ApiError::Io(_)) {
        EXIT_CONFIG
    } else {
        EXIT_FETCH
    }
}

fn fail(e: &ApiError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(exit_code(e));
}

fn load_config(cli: &CliConfig) -> Result<AppConfig, ApiError> {
    let config = cli.load_app_config()?;
    config.validate()?;
    Ok(config)
}

async fn fetch(
    client: &ApiClient,
    scope: &RequestScope,
    resource: Resource,
) -> Result<serde_json::Value, ApiError> {
    match resource {
        Resource::Home => get_home(client, scope).await,
        Resource::Health => Ok(serde_json::to_value(get_health(client, scope).await?)?),
        Resource::All => {
            let home = get_home(client, scope).await?;
            let health = get_health(client, scope).await?;
            Ok(serde_json::json!({ "home": home, "health": health }))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // The logger is configured from the file, so nothing is installed yet.
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };

    if cli.json_logs || config.logging.json {
        logger::init_json_logger(&config.logging.level, cli.verbose);
    } else {
        logger::init_cli_logger(&config.logging.level, cli.verbose);
    }
    tracing::info!("Starting jarvis-web");
    tracing::debug!("CLI config: {:?}", cli);

    if cli.print_config {
        let site = config.site();
        let output = serde_json::json!({
            "images": site.images,
            "env": site.env.resolve_from_process(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let client = match ApiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => fail(&e),
    };
    tracing::info!("Backend base URL: {}", client.base_url());

    // One invocation is one request lifecycle.
    let scope = RequestScope::new();
    match fetch(&client, &scope, cli.resource).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use jarvis_web::BaseUrl;

    #[test]
    fn test_config_errors_exit_with_config_code() {
        let missing = ApiError::MissingConfigError {
            field: "api.base_url".to_string(),
        };
        let invalid = ApiError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        let io = ApiError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "jarvis-web.toml",
        ));

        assert_eq!(exit_code(&missing), EXIT_CONFIG);
        assert_eq!(exit_code(&invalid), EXIT_CONFIG);
        assert_eq!(exit_code(&io), EXIT_CONFIG);
    }

    #[test]
    fn test_fetch_errors_exit_with_fetch_code() {
        let failed = ApiError::FetchFailed {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        let request = ApiError::Request(
            reqwest::Client::new()
                .get("http://")
                .build()
                .unwrap_err(),
        );
        let decode = ApiError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err());

        assert_eq!(exit_code(&failed), EXIT_FETCH);
        assert_eq!(exit_code(&request), EXIT_FETCH);
        assert_eq!(exit_code(&decode), EXIT_FETCH);
    }

    #[tokio::test]
    async fn test_fetch_all_returns_home_and_health() {
        let server = MockServer::start();
        let home_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .json_body(serde_json::json!({"message": "wellcome to MY-Jarvis-Gua API"}));
        });
        let health_mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .json_body(serde_json::json!({"status": "healthy", "version": "1.0.0"}));
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let scope = RequestScope::new();
        let body = fetch(&client, &scope, Resource::All).await.unwrap();

        home_mock.assert_hits(1);
        health_mock.assert_hits(1);
        assert_eq!(body["home"]["message"], "wellcome to MY-Jarvis-Gua API");
        assert_eq!(body["health"]["status"], "healthy");
        assert_eq!(body["health"]["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_health_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(serde_json::json!({"message": "hi"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(503);
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let err = fetch(&client, &RequestScope::new(), Resource::All)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::FetchFailed { .. }));
        assert_eq!(exit_code(&err), EXIT_FETCH);
    }
}
