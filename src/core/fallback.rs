use crate::domain::model::{DigitalAddress, FallbackEntry, MatchPolicy};
use crate::utils::error::Result;
use std::sync::{Arc, LazyLock};

/// 內建備援資料：(match key, 郵遞區號, 完整地址)
const BUILTIN_ROWS: &[(&str, &str, &str)] = &[
    ("新宿区", "163-8001", "東京都新宿区西新宿二丁目8番1号"),
    ("大阪市北区", "530-0001", "大阪府大阪市北区梅田一丁目1番1号"),
    ("横浜市西区", "220-8120", "神奈川県横浜市西区みなとみらい二丁目2番1号"),
];

static BUILTIN: LazyLock<Arc<FallbackTable>> = LazyLock::new(|| {
    let entries = BUILTIN_ROWS
        .iter()
        .map(|(key, postal, address)| {
            FallbackEntry::new(key, postal, address).expect("builtin fallback row is valid")
        })
        .collect();
    Arc::new(FallbackTable { entries })
});

/// 遠端服務無法連線時使用的近似比對表。建立後唯讀。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackTable {
    entries: Vec<FallbackEntry>,
}

impl FallbackTable {
    pub fn new(entries: Vec<FallbackEntry>) -> Self {
        Self { entries }
    }

    /// 由 (key, postal code, address) 列建立，任一列不合法即失敗
    pub fn from_rows<'a, I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let entries = rows
            .into_iter()
            .map(|(key, postal, address)| FallbackEntry::new(key, postal, address))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn entries(&self) -> &[FallbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 依表格順序取第一個 key 被輸入包含的列（first match，不計分）
    pub fn find(&self, input: &DigitalAddress, policy: MatchPolicy) -> Option<&FallbackEntry> {
        self.entries
            .iter()
            .find(|entry| policy.contains(input.as_str(), entry.match_key()))
    }
}
