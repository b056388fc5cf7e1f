use crate::domain::model::{DigitalAddress, InvalidInput};

/// 去除前後空白；結果為空時回傳 `InvalidInput("empty")`。
///
/// 不做大小寫或全形/半形轉換。
pub fn normalize(raw: &str) -> Result<DigitalAddress, InvalidInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::empty());
    }
    Ok(DigitalAddress::from_trimmed(trimmed))
}
