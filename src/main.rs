use clap::Parser;
use da_resolver::core::ConfigProvider;
use da_resolver::shell;
use da_resolver::utils::{logger, validation::Validate};
use da_resolver::{
    Backend, CliConfig, DirectoryService, FallbackTable, HttpDirectoryService, InMemoryDirectory,
    OutcomeKind, Resolver, TomlConfig,
};
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("デジタルアドレス検索サービスを開始しました");

    let mut fallback = FallbackTable::builtin();

    // 載入 TOML 配置
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = match TomlConfig::from_file(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        };
        if let Err(e) = file.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        if let Some(table) = file.fallback_table()? {
            tracing::info!("Using {} fallback rows from config", table.len());
            fallback = Arc::new(table);
        }
        config.merge_toml(&file);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let directory: Box<dyn DirectoryService> = match config.backend {
        Backend::Http => Box::new(HttpDirectoryService::from_config(&config)?),
        Backend::Demo => Box::new(InMemoryDirectory::demo()),
        Backend::Offline => Box::new(InMemoryDirectory::offline()),
    };
    tracing::debug!("Directory backend: {}", directory.name());

    let resolver = Resolver::new(directory)
        .with_fallback(fallback)
        .with_policy(config.match_policy());

    match config.address.as_deref() {
        Some(address) => {
            let outcome = resolver.resolve_input(address).await;
            println!("{}", shell::format_outcome(&outcome, config.json)?);

            let exit_code = match outcome.kind() {
                OutcomeKind::Resolved => 0,
                OutcomeKind::NotFound => 1,
                OutcomeKind::InvalidInput => 2,
                OutcomeKind::TransportFailure => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            let processed =
                shell::run_interactive(&resolver, stdin, &mut stdout, config.json).await?;
            tracing::info!("Processed {} addresses", processed);
        }
    }

    Ok(())
}
