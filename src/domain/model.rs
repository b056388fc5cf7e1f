use crate::utils::error::{ResolverError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static POSTAL_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3})-?([0-9]{4})$").expect("valid postal code pattern"));

/// 已正規化的數位地址：去除前後空白且保證非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DigitalAddress(String);

impl DigitalAddress {
    /// 僅供 normalizer 使用，呼叫端需保證已 trim 且非空
    pub(crate) fn from_trimmed(value: &str) -> Self {
        debug_assert!(!value.is_empty() && value.trim() == value);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for DigitalAddress {
    type Error = InvalidInput;

    fn try_from(raw: &str) -> std::result::Result<Self, Self::Error> {
        crate::core::normalizer::normalize(raw)
    }
}

impl AsRef<str> for DigitalAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DigitalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidInput {
    pub reason: String,
}

impl InvalidInput {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("empty")
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.reason)
    }
}

impl std::error::Error for InvalidInput {}

/// 日本郵遞區號，固定以 `NNN-NNNN` 形式保存
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// 接受 `NNN-NNNN` 或七位數字，其餘一律拒絕
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let caps = POSTAL_CODE_PATTERN.captures(trimmed).ok_or_else(|| {
            ResolverError::invalid_record(format!("malformed postal code: '{}'", raw))
        })?;
        Ok(Self(format!("{}-{}", &caps[1], &caps[2])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn require_full_address(full_address: &str) -> Result<String> {
    let trimmed = full_address.trim();
    if trimmed.is_empty() {
        return Err(ResolverError::invalid_record("full address is empty"));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    postal_code: PostalCode,
    full_address: String,
    digital_address: DigitalAddress,
}

impl AddressRecord {
    pub fn new(
        postal_code: &str,
        full_address: &str,
        digital_address: DigitalAddress,
    ) -> Result<Self> {
        Ok(Self {
            postal_code: PostalCode::parse(postal_code)?,
            full_address: require_full_address(full_address)?,
            digital_address,
        })
    }

    pub fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }

    pub fn full_address(&self) -> &str {
        &self.full_address
    }

    pub fn digital_address(&self) -> &DigitalAddress {
        &self.digital_address
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Resolved,
    NotFound,
    TransportFailure,
    InvalidInput,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Resolved => "resolved",
            Self::NotFound => "not_found",
            Self::TransportFailure => "transport_failure",
            Self::InvalidInput => "invalid_input",
        };
        f.write_str(tag)
    }
}

/// 單次查詢的最終結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Resolved(AddressRecord),
    NotFound,
    TransportFailure { reason: String },
    InvalidInput(InvalidInput),
}

impl ResolutionOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Resolved(_) => OutcomeKind::Resolved,
            Self::NotFound => OutcomeKind::NotFound,
            Self::TransportFailure { .. } => OutcomeKind::TransportFailure,
            Self::InvalidInput(_) => OutcomeKind::InvalidInput,
        }
    }

    pub fn record(&self) -> Option<&AddressRecord> {
        match self {
            Self::Resolved(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<InvalidInput> for ResolutionOutcome {
    fn from(err: InvalidInput) -> Self {
        Self::InvalidInput(err)
    }
}

/// 備援表比對 key 的方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// 原字串子字串比對，不做大小寫或字形轉換
    #[default]
    Verbatim,
    /// 兩邊都轉成 Unicode 小寫後比對
    CaseInsensitive,
}

impl MatchPolicy {
    pub fn contains(self, input: &str, key: &str) -> bool {
        match self {
            Self::Verbatim => input.contains(key),
            Self::CaseInsensitive => input.to_lowercase().contains(&key.to_lowercase()),
        }
    }
}

/// 離線備援表中的一列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEntry {
    match_key: String,
    postal_code: PostalCode,
    full_address: String,
}

impl FallbackEntry {
    pub fn new(match_key: &str, postal_code: &str, full_address: &str) -> Result<Self> {
        if match_key.is_empty() {
            return Err(ResolverError::invalid_record("fallback match key is empty"));
        }
        Ok(Self {
            match_key: match_key.to_string(),
            postal_code: PostalCode::parse(postal_code)?,
            full_address: require_full_address(full_address)?,
        })
    }

    pub fn match_key(&self) -> &str {
        &self.match_key
    }

    pub fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }

    pub fn full_address(&self) -> &str {
        &self.full_address
    }

    /// 以此列的郵遞區號與地址合成紀錄，digital address 回填呼叫端的輸入
    pub fn to_record(&self, digital_address: &DigitalAddress) -> AddressRecord {
        AddressRecord {
            postal_code: self.postal_code.clone(),
            full_address: self.full_address.clone(),
            digital_address: digital_address.clone(),
        }
    }
}
