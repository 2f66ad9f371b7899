//! Base64 图像负载解码
//!
//! 拍照或相册返回的图像以 base64 文本传递，可能带有 `data:image/jpeg;base64,` 前缀。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// 去掉 data URI 头部，只保留 base64 正文
///
/// 没有头部时原样返回（去除首尾空白）。
pub fn strip_data_uri(input: &str) -> &str {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("data:") {
        if let Some((header, body)) = rest.split_once(',') {
            if header.ends_with(";base64") {
                return body;
            }
        }
    }
    trimmed
}

/// 解码 base64 图像负载为原始字节
pub fn decode_payload(input: &str) -> Result<Vec<u8>> {
    let body = strip_data_uri(input);
    // 换行分段的 base64 在移动端很常见
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_base64_headers() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("  QUJD\n"), "QUJD");
        assert_eq!(strip_data_uri("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn ignores_line_breaks() {
        assert_eq!(decode_payload("QU\nJD").unwrap(), b"ABC");
    }
}
