use crate::domain::model::DigitalAddress;
use crate::domain::ports::{DirectoryService, LookupReply};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// 記憶體內的完全比對目錄，用於展示與測試
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: HashMap<String, (String, String)>,
    latency: Option<Duration>,
    offline: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 內建三筆展示用地址
    pub fn demo() -> Self {
        Self::new()
            .with_record("東京都新宿区西新宿2-8-1", "163-8001", "東京都新宿区西新宿二丁目8番1号")
            .with_record("大阪府大阪市北区梅田1-1-1", "530-0001", "大阪府大阪市北区梅田一丁目1番1号")
            .with_record(
                "神奈川県横浜市西区みなとみらい2-2-1",
                "220-8120",
                "神奈川県横浜市西区みなとみらい二丁目2番1号",
            )
    }

    /// 永遠回覆 `Unavailable`
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, digital_address: &str, postal_code: &str, full_address: &str) -> Self {
        self.records.insert(
            digital_address.to_string(),
            (postal_code.to_string(), full_address.to_string()),
        );
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    fn name(&self) -> &str {
        if self.offline {
            "offline"
        } else {
            "in-memory"
        }
    }

    async fn lookup(&self, address: &DigitalAddress) -> LookupReply {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.offline {
            return LookupReply::Unavailable("directory is offline".to_string());
        }

        match self.records.get(address.as_str()) {
            Some((postal_code, full_address)) => LookupReply::Found {
                postal_code: postal_code.clone(),
                full_address: full_address.clone(),
                digital_address: Some(address.to_string()),
            },
            None => LookupReply::NotFound,
        }
    }
}
