use crate::domain::model::{DigitalAddress, MatchPolicy};
use async_trait::async_trait;
use std::time::Duration;

/// 遠端目錄服務回覆的分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupReply {
    /// 服務回傳一筆紀錄；欄位尚未驗證
    Found {
        postal_code: String,
        full_address: String,
        digital_address: Option<String>,
    },
    /// 服務明確表示查無此地址
    NotFound,
    /// 服務回傳格式正確的錯誤內容
    ApiError(String),
    /// 連線失敗、逾時或回應無法解析
    Unavailable(String),
}

/// 遠端數位地址查詢。每次呼叫只送出一個請求，不重試。
#[async_trait]
pub trait DirectoryService: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, address: &DigitalAddress) -> LookupReply;
}

#[async_trait]
impl<T: DirectoryService + ?Sized> DirectoryService for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn lookup(&self, address: &DigitalAddress) -> LookupReply {
        (**self).lookup(address).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn match_policy(&self) -> MatchPolicy;
}
