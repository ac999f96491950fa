//! Authenticated JSON POST gateway with token lifecycle management.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use url::Url;

use crate::{Error, Settings};

/// Service root for user-created data objects (timeseries et al).
pub const USER_DATA_SERVICE: &str = "DSWSClient/V1/DSUserDataService.svc/rest/";

/// Service root for economic change filters.
pub const ECONOMIC_FILTER_SERVICE: &str = "DSWSClient/V1/DSEconomicsFilterService.svc/rest/";

/// App identifier sent with every logon so the operator can track client
/// versions.
const APP_ID: &str = concat!("dsws-rs-", env!("CARGO_PKG_VERSION"));

const USER_AGENT: &str = concat!("dsws-rs/", env!("CARGO_PKG_VERSION"));

/// Tokens are valid for ~24 hours; renew when a request is made this close
/// to expiry.
const TOKEN_RENEWAL_WINDOW_MINS: i64 = 15;

/// A `{"Key": ..., "Value": ...}` pair as used in request `Properties` and
/// `Filters` lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyPair {
    pub key: String,
    pub value: serde_json::Value,
}

impl PropertyPair {
    pub fn new(key: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenResponse {
    token_value: String,
    #[serde(with = "crate::jsondate::utc")]
    token_expiry: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireFault {
    code: String,
    message: String,
    #[serde(default)]
    sub_code: Option<String>,
}

#[derive(Debug, Clone)]
struct TokenState {
    value: String,
    expiry: DateTime<Utc>,
}

/// Gateway to one DSWS service root.
///
/// Construction logs on with the configured credentials and holds the
/// returned token for the lifetime of the client, renewing it automatically
/// when a request is made within 15 minutes of expiry. All requests are
/// single-shot POSTs with the configured timeout; a timeout surfaces as a
/// transport failure, never as an empty result.
pub struct Client {
    http: reqwest::Client,
    service_url: Url,
    settings: Settings,
    token: Mutex<Option<TokenState>>,
}

impl Client {
    /// Connects to the given service root (one of [`USER_DATA_SERVICE`] or
    /// [`ECONOMIC_FILTER_SERVICE`]) and performs the initial logon.
    pub async fn connect(settings: Settings, service: &str) -> Result<Self, Error> {
        if !settings.has_credentials() {
            return Err(Error::Credentials);
        }
        let service_url = settings
            .base_url()?
            .join(service)
            .map_err(|e| Error::Config(format!("invalid service path: {e}")))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout());
        if let Some(proxy) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(path) = &settings.ca_bundle {
            let pem = std::fs::read(path)
                .map_err(|e| Error::Config(format!("cannot read CA bundle: {e}")))?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem)
                .map_err(|e| Error::Config(format!("invalid CA bundle: {e}")))?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }
        let http = builder.build().map_err(|e| {
            tracing::error!("failed to build HTTP client: {}", e);
            Error::RequestFailed
        })?;

        let client = Self {
            http,
            service_url,
            settings,
            token: Mutex::new(None),
        };
        // Logon up front so credential faults abort construction.
        client.token_value().await?;
        Ok(client)
    }

    /// Returns the current token value, logging on or renewing first if the
    /// held token is absent or within the renewal window.
    pub async fn token_value(&self) -> Result<String, Error> {
        let mut guard = self.token.lock().await;
        let renew_at = Utc::now() + Duration::minutes(TOKEN_RENEWAL_WINDOW_MINS);
        if let Some(token) = guard.as_ref() {
            if token.expiry > renew_at {
                return Ok(token.value.clone());
            }
            tracing::debug!("token close to expiry, renewing");
        }
        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<TokenState, Error> {
        tracing::info!("requesting new token");
        let body = json!({
            "UserName": self.settings.username,
            "Password": self.settings.password,
            "Properties": [{"Key": "__AppId", "Value": APP_ID}],
        });
        let resp: TokenResponse = self.post("GetToken", &body).await?;
        tracing::info!("new token received");
        Ok(TokenState {
            value: resp.token_value,
            expiry: resp.token_expiry,
        })
    }

    /// POSTs a JSON body to the named endpoint under this client's service
    /// root and decodes the JSON response.
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        let url = self.service_url.join(endpoint).map_err(|e| {
            tracing::error!("invalid endpoint '{}': {}", endpoint, e);
            Error::RequestFailed
        })?;
        tracing::debug!(%endpoint, "starting web request");

        let resp = self.http.post(url).json(body).send().await.map_err(|e| {
            tracing::error!("request to {} failed: {}", endpoint, e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        // 400/403 carrying a `{Code, Message}` body is a DSFault: the
        // session itself is unusable (bad credentials, access blocked).
        if status.as_u16() == 400 || status.as_u16() == 403 {
            if let Ok(fault) = serde_json::from_str::<WireFault>(&text) {
                tracing::error!("service returned a fault: {} - {}", fault.code, fault.message);
                return Err(Error::Fault {
                    code: fault.code,
                    sub_code: fault.sub_code,
                    message: fault.message,
                });
            }
        }
        if !status.is_success() {
            let snippet = truncate_body(&text);
            tracing::error!("request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("failed to parse response: {} | body: {}", e, truncate_body(&text));
            Error::RequestFailed
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...[truncated]", &body[..cut])
    }
}
