use crate::domain::model::DigitalAddress;
use crate::domain::ports::{ConfigProvider, DirectoryService, LookupReply};
use crate::utils::error::Result;
use crate::utils::validation::{validate_endpoint, validate_required_field};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://guide-biz.da.pf.japanpost.jp/api/search/address";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    digital_address: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    success: Option<bool>,
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "postalCode", alias = "postal_code", alias = "zip_code")]
    postal_code: Option<String>,
    #[serde(rename = "address", alias = "fullAddress", alias = "full_address")]
    full_address: Option<String>,
    #[serde(rename = "digitalAddress", alias = "digital_address")]
    digital_address: Option<String>,
}

/// 透過 HTTP POST JSON 查詢數位地址
#[derive(Debug, Clone)]
pub struct HttpDirectoryService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpDirectoryService {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_endpoint("endpoint", &endpoint)?;
        Ok(Self {
            client: Client::builder().build()?,
            endpoint,
            api_key: None,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let endpoint = config.endpoint().map(str::to_string);
        let endpoint = validate_required_field("endpoint", &endpoint)?;
        validate_endpoint("endpoint", endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.clone(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DirectoryService for HttpDirectoryService {
    fn name(&self) -> &str {
        "http"
    }

    async fn lookup(&self, address: &DigitalAddress) -> LookupReply {
        tracing::debug!("Making API request to: {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&SearchRequest {
            digital_address: address.as_str(),
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return LookupReply::Unavailable(format!("request failed: {}", e)),
        };

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        match response.bytes().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => LookupReply::Unavailable(format!("failed to read response body: {}", e)),
        }
    }
}

/// 錯誤內容可能是 `{"error": "..."}`、`{"error": {"message": "..."}}` 或 `{"message": "..."}`
fn error_message(body: &Value) -> Option<String> {
    let text = match body.get("error") {
        Some(Value::String(message)) => Some(message.as_str()),
        Some(Value::Object(inner)) => inner.get("message").and_then(Value::as_str),
        _ => None,
    }
    .or_else(|| body.get("message").and_then(Value::as_str))?;

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn classify_response(status: StatusCode, body: &[u8]) -> LookupReply {
    if status == StatusCode::NOT_FOUND {
        return LookupReply::NotFound;
    }

    // 閘道類狀態一律視為服務不可用，不看內容
    if matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    ) {
        return LookupReply::Unavailable(format!("HTTP {}", status));
    }

    if !status.is_success() {
        return match serde_json::from_slice::<Value>(body).ok().as_ref().and_then(error_message) {
            Some(message) => LookupReply::ApiError(message),
            None => LookupReply::Unavailable(format!("HTTP {}", status)),
        };
    }

    let raw: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return LookupReply::Unavailable(format!("malformed response: {}", e)),
    };
    let parsed: SearchResponse = match serde_json::from_value(raw.clone()) {
        Ok(parsed) => parsed,
        Err(e) => return LookupReply::Unavailable(format!("malformed response: {}", e)),
    };

    if parsed.success == Some(false) {
        return match error_message(&raw) {
            Some(message) => LookupReply::ApiError(message),
            None => LookupReply::NotFound,
        };
    }

    match parsed.data {
        Some(data) => LookupReply::Found {
            postal_code: data.postal_code.unwrap_or_default(),
            full_address: data.full_address.unwrap_or_default(),
            digital_address: data.digital_address,
        },
        // 沒有 success 旗標但帶有錯誤內容時，視為 API 錯誤
        None if parsed.success.is_none() => match error_message(&raw) {
            Some(message) => LookupReply::ApiError(message),
            None => LookupReply::NotFound,
        },
        None => LookupReply::NotFound,
    }
}
