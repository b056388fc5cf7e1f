//! 終端機介面：把查詢結果轉成給人看的日文訊息。
//!
//! 這一層只持有自己的輸出狀態，與 resolver 之間只透過 [`ResolutionOutcome`] 溝通。

use crate::core::resolver::Resolver;
use crate::domain::model::ResolutionOutcome;
use crate::domain::ports::DirectoryService;
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const MSG_EMPTY_INPUT: &str = "デジタルアドレスを入力してください";
pub const MSG_NOT_FOUND: &str =
    "指定されたデジタルアドレスが見つかりませんでした。正しいアドレスを入力してください。";
pub const MSG_SEARCH_ERROR_PREFIX: &str = "検索エラー";

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn render(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Resolved(record) => format!(
            "郵便番号: {}\n住所: {}\nデジタルアドレス: {}",
            or_dash(record.postal_code().as_str()),
            or_dash(record.full_address()),
            or_dash(record.digital_address().as_str()),
        ),
        ResolutionOutcome::NotFound => MSG_NOT_FOUND.to_string(),
        ResolutionOutcome::TransportFailure { reason } => {
            format!("{}: {}", MSG_SEARCH_ERROR_PREFIX, reason)
        }
        ResolutionOutcome::InvalidInput(_) => MSG_EMPTY_INPUT.to_string(),
    }
}

pub fn render_json(outcome: &ResolutionOutcome) -> Result<String> {
    Ok(serde_json::to_string(outcome)?)
}

pub fn format_outcome(outcome: &ResolutionOutcome, json: bool) -> Result<String> {
    if json {
        render_json(outcome)
    } else {
        Ok(render(outcome))
    }
}

/// 逐行讀取輸入並查詢，每行處理完才讀下一行。回傳處理的行數。
pub async fn run_interactive<D, R, W>(
    resolver: &Resolver<D>,
    reader: R,
    writer: &mut W,
    json: bool,
) -> Result<usize>
where
    D: DirectoryService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut processed = 0;

    while let Some(line) = lines.next_line().await? {
        let outcome = resolver.resolve_input(&line).await;
        let mut text = format_outcome(&outcome, json)?;
        text.push('\n');
        if !json {
            text.push('\n');
        }
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        processed += 1;
    }

    Ok(processed)
}
