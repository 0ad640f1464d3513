use serde::Deserialize;

use crate::config::OAuthProviderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "google" => Some(Provider::Google),
            "github" => Some(Provider::GitHub),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
        }
    }
}

/// What the services need from a federated identity: an email plus a name.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn authorize_url(provider: Provider, config: &OAuthProviderConfig, state: &str) -> String {
    let redirect = urlencode(&config.redirect_url);
    match provider {
        Provider::Google => format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={redirect}\
             &response_type=code&scope=openid%20email%20profile&state={state}",
            config.client_id
        ),
        Provider::GitHub => format!(
            "https://github.com/login/oauth/authorize?client_id={}&redirect_uri={redirect}\
             &scope=user:email&state={state}",
            config.client_id
        ),
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleUserinfo {
    email: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
}

#[derive(Deserialize)]
struct GithubUser {
    email: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Exchange the callback code for an access token and fetch the profile.
pub async fn fetch_profile(
    provider: Provider,
    config: &OAuthProviderConfig,
    code: &str,
) -> Result<OAuthProfile, String> {
    let client = reqwest::Client::new();
    match provider {
        Provider::Google => {
            let token: TokenResponse = client
                .post("https://oauth2.googleapis.com/token")
                .form(&[
                    ("code", code),
                    ("client_id", config.client_id.as_str()),
                    ("client_secret", config.client_secret.as_str()),
                    ("redirect_uri", config.redirect_url.as_str()),
                    ("grant_type", "authorization_code"),
                ])
                .send()
                .await
                .map_err(|e| format!("Google token exchange failed: {e}"))?
                .json()
                .await
                .map_err(|e| format!("Google token response invalid: {e}"))?;

            let userinfo: GoogleUserinfo = client
                .get("https://openidconnect.googleapis.com/v1/userinfo")
                .bearer_auth(&token.access_token)
                .send()
                .await
                .map_err(|e| format!("Google userinfo failed: {e}"))?
                .json()
                .await
                .map_err(|e| format!("Google userinfo invalid: {e}"))?;

            Ok(OAuthProfile {
                email: userinfo.email,
                first_name: userinfo.given_name,
                last_name: userinfo.family_name,
            })
        }
        Provider::GitHub => {
            let token: TokenResponse = client
                .post("https://github.com/login/oauth/access_token")
                .header("accept", "application/json")
                .form(&[
                    ("code", code),
                    ("client_id", config.client_id.as_str()),
                    ("client_secret", config.client_secret.as_str()),
                    ("redirect_uri", config.redirect_url.as_str()),
                ])
                .send()
                .await
                .map_err(|e| format!("GitHub token exchange failed: {e}"))?
                .json()
                .await
                .map_err(|e| format!("GitHub token response invalid: {e}"))?;

            let user: GithubUser = client
                .get("https://api.github.com/user")
                .header("user-agent", "taskboard")
                .bearer_auth(&token.access_token)
                .send()
                .await
                .map_err(|e| format!("GitHub user fetch failed: {e}"))?
                .json()
                .await
                .map_err(|e| format!("GitHub user response invalid: {e}"))?;

            // The profile email is often private; fall back to the primary
            // verified address from the emails endpoint.
            let email = match user.email {
                Some(email) => email,
                None => {
                    let emails: Vec<GithubEmail> = client
                        .get("https://api.github.com/user/emails")
                        .header("user-agent", "taskboard")
                        .bearer_auth(&token.access_token)
                        .send()
                        .await
                        .map_err(|e| format!("GitHub emails fetch failed: {e}"))?
                        .json()
                        .await
                        .map_err(|e| format!("GitHub emails response invalid: {e}"))?;
                    emails
                        .into_iter()
                        .find(|e| e.primary && e.verified)
                        .map(|e| e.email)
                        .ok_or_else(|| "GitHub account has no verified primary email".to_string())?
                }
            };

            let (first_name, last_name) = match user.name.as_deref().and_then(|n| n.split_once(' '))
            {
                Some((first, last)) => (first.to_string(), last.to_string()),
                None => (user.name.unwrap_or_default(), String::new()),
            };

            Ok(OAuthProfile {
                email,
                first_name,
                last_name,
            })
        }
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
