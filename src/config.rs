use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    pub google_oauth: Option<OAuthProviderConfig>,
    pub github_oauth: Option<OAuthProviderConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let jwt_ttl_minutes: i64 = env_or("TASKBOARD_JWT_TTL_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_JWT_TTL_MINUTES: {e}"))?;

        let host: IpAddr = env_or("TASKBOARD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_HOST: {e}"))?;

        let port: u16 = env_or("TASKBOARD_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_PORT: {e}"))?;

        let base_url = env_or("TASKBOARD_BASE_URL", &format!("http://{host}:{port}"));

        let log_level = env_or("TASKBOARD_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("TASKBOARD_SMTP_HOST").ok(),
            std::env::var("TASKBOARD_SMTP_PORT").ok(),
            std::env::var("TASKBOARD_SMTP_USER").ok(),
            std::env::var("TASKBOARD_SMTP_PASS").ok(),
            std::env::var("TASKBOARD_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid TASKBOARD_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        let google_oauth = oauth_provider("GOOGLE");
        let github_oauth = oauth_provider("GITHUB");

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_ttl_minutes,
            host,
            port,
            base_url,
            log_level,
            smtp,
            google_oauth,
            github_oauth,
        })
    }
}

fn oauth_provider(prefix: &str) -> Option<OAuthProviderConfig> {
    match (
        std::env::var(format!("{prefix}_CLIENT_ID")).ok(),
        std::env::var(format!("{prefix}_CLIENT_SECRET")).ok(),
        std::env::var(format!("{prefix}_REDIRECT_URL")).ok(),
    ) {
        (Some(client_id), Some(client_secret), Some(redirect_url)) => Some(OAuthProviderConfig {
            client_id,
            client_secret,
            redirect_url,
        }),
        _ => None,
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
