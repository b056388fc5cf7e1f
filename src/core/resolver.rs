use crate::core::fallback::FallbackTable;
use crate::core::normalizer::normalize;
use crate::domain::model::{AddressRecord, DigitalAddress, MatchPolicy, ResolutionOutcome};
use crate::domain::ports::{DirectoryService, LookupReply};
use std::sync::Arc;

/// 先查遠端目錄服務，服務不可用時才改查備援表。
///
/// 每個請求只打一次遠端，沒有重試、逾時或取消；需要的話由呼叫端在外層處理。
/// 併發的多個請求彼此獨立，各自跑完。
pub struct Resolver<D: DirectoryService> {
    directory: D,
    fallback: Arc<FallbackTable>,
    policy: MatchPolicy,
}

impl<D: DirectoryService> Resolver<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            fallback: FallbackTable::builtin(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<FallbackTable>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn fallback(&self) -> &FallbackTable {
        &self.fallback
    }

    /// normalize + resolve，空白輸入直接回傳 `InvalidInput`，不會打遠端
    pub async fn resolve_input(&self, raw: &str) -> ResolutionOutcome {
        match normalize(raw) {
            Ok(address) => self.resolve(&address).await,
            Err(invalid) => {
                tracing::debug!("Rejected input: {}", invalid);
                invalid.into()
            }
        }
    }

    pub async fn resolve(&self, address: &DigitalAddress) -> ResolutionOutcome {
        tracing::debug!(
            service = self.directory.name(),
            "Looking up digital address: {}",
            address
        );

        let outcome = match self.directory.lookup(address).await {
            LookupReply::Found {
                postal_code,
                full_address,
                digital_address,
            } => {
                if let Some(echoed) = digital_address.as_deref() {
                    if echoed != address.as_str() {
                        tracing::debug!("Remote echoed '{}', keeping caller input", echoed);
                    }
                }
                // 遠端回傳的 digitalAddress 不可信，一律改回呼叫端輸入
                match AddressRecord::new(&postal_code, &full_address, address.clone()) {
                    Ok(record) => ResolutionOutcome::Resolved(record),
                    Err(e) => {
                        tracing::warn!("⚠️ Malformed record from directory service: {}", e);
                        self.resolve_from_fallback(address)
                    }
                }
            }
            LookupReply::NotFound => ResolutionOutcome::NotFound,
            LookupReply::ApiError(message) => {
                tracing::warn!("Directory service reported an error: {}", message);
                ResolutionOutcome::TransportFailure { reason: message }
            }
            LookupReply::Unavailable(reason) => {
                tracing::warn!("⚠️ Directory service unavailable ({}), using fallback table", reason);
                self.resolve_from_fallback(address)
            }
        };

        tracing::info!("Resolution finished: {} -> {}", address, outcome.kind());
        outcome
    }

    fn resolve_from_fallback(&self, address: &DigitalAddress) -> ResolutionOutcome {
        match self.fallback.find(address, self.policy) {
            Some(entry) => {
                tracing::debug!("Fallback matched key '{}'", entry.match_key());
                ResolutionOutcome::Resolved(entry.to_record(address))
            }
            None => {
                tracing::debug!(
                    "No fallback key contained in input ({} entries checked)",
                    self.fallback.len()
                );
                ResolutionOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OutcomeKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockDirectory {
        reply: LookupReply,
        calls: Arc<AtomicUsize>,
    }

    impl MockDirectory {
        fn new(reply: LookupReply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn unavailable() -> Self {
            Self::new(LookupReply::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl DirectoryService for MockDirectory {
        fn name(&self) -> &str {
            "mock"
        }

        async fn lookup(&self, _address: &DigitalAddress) -> LookupReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn found(postal: &str, address: &str, echo: Option<&str>) -> LookupReply {
        LookupReply::Found {
            postal_code: postal.to_string(),
            full_address: address.to_string(),
            digital_address: echo.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_remote_record_echoes_caller_input() {
        let directory = MockDirectory::new(found(
            "1638001",
            "東京都新宿区西新宿二丁目8番1号",
            Some("SOMETHING-ELSE"),
        ));
        let calls = directory.calls.clone();
        let resolver = Resolver::new(directory);

        let outcome = resolver.resolve_input("  DA.TOKYO.1  ").await;
        let record = outcome.record().unwrap();
        assert_eq!(record.postal_code().as_str(), "163-8001");
        assert_eq!(record.digital_address().as_str(), "DA.TOKYO.1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_not_found_skips_fallback() {
        let resolver = Resolver::new(MockDirectory::new(LookupReply::NotFound));
        let outcome = resolver.resolve_input("東京都新宿区西新宿2-8-1").await;
        assert_eq!(outcome, ResolutionOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_api_error_is_authoritative() {
        let resolver = Resolver::new(MockDirectory::new(LookupReply::ApiError(
            "quota exceeded".to_string(),
        )));

        // 輸入包含備援 key，但 API 錯誤不可改走備援
        let outcome = resolver.resolve_input("東京都新宿区西新宿2-8-1").await;
        assert_eq!(
            outcome,
            ResolutionOutcome::TransportFailure {
                reason: "quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unavailable_falls_back_to_table() {
        let resolver = Resolver::new(MockDirectory::unavailable());
        let outcome = resolver.resolve_input("  東京都新宿区西新宿2-8-1  ").await;

        let record = outcome.record().unwrap();
        assert_eq!(record.postal_code().as_str(), "163-8001");
        assert_eq!(record.full_address(), "東京都新宿区西新宿二丁目8番1号");
        assert_eq!(record.digital_address().as_str(), "東京都新宿区西新宿2-8-1");
    }

    #[tokio::test]
    async fn test_unavailable_without_match_is_not_found() {
        let resolver = Resolver::new(MockDirectory::unavailable());
        let outcome = resolver.resolve_input("DA.UNKNOWN.0-0-0").await;
        assert_eq!(outcome, ResolutionOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_remote_record_uses_fallback() {
        let resolver = Resolver::new(MockDirectory::new(found("", "", None)));

        let outcome = resolver.resolve_input("大阪府大阪市北区梅田1-1-1").await;
        assert_eq!(outcome.record().unwrap().postal_code().as_str(), "530-0001");

        let outcome = resolver.resolve_input("DA.UNKNOWN.0-0-0").await;
        assert_eq!(outcome.kind(), OutcomeKind::NotFound);
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_directory() {
        let directory = MockDirectory::unavailable();
        let calls = directory.calls.clone();
        let resolver = Resolver::new(directory);

        let outcome = resolver.resolve_input("   ").await;
        assert_eq!(outcome.kind(), OutcomeKind::InvalidInput);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let outcome = resolver.resolve_input("DA.UNKNOWN.0-0-0").await;
        assert_eq!(outcome, ResolutionOutcome::NotFound);
        assert_eq!(resolver.directory().calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.directory().name(), "mock");
    }

    #[tokio::test]
    async fn test_custom_table_and_policy() {
        let table = FallbackTable::from_rows([
            ("DA.OSAKA", "530-0001", "大阪府大阪市北区梅田一丁目1番1号"),
            ("DA.", "100-0001", "東京都千代田区千代田1番"),
        ])
        .unwrap();

        let resolver = Resolver::new(MockDirectory::unavailable())
            .with_fallback(Arc::new(table))
            .with_policy(MatchPolicy::CaseInsensitive);

        let outcome = resolver.resolve_input("da.osaka.1-1-1").await;
        assert_eq!(outcome.record().unwrap().postal_code().as_str(), "530-0001");

        let outcome = resolver.resolve_input("DA.NAGOYA.1").await;
        assert_eq!(outcome.record().unwrap().postal_code().as_str(), "100-0001");
    }
}
