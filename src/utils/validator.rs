use anyhow::Result;
use url::Url;

use crate::core::layout::MAX_PAK_INDEX;

/// 只接受 http/https 地址
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

pub fn validate_base_url(url: &str) -> Result<()> {
    if url.is_empty() {
        anyhow::bail!("baseUrl 不能为空");
    }
    if !is_valid_url(url) {
        anyhow::bail!("baseUrl 不是有效的 HTTP(S) 地址: {}", url);
    }
    Ok(())
}

/// 编号区间的上界必须能格式化为8位；from > to 合法，表示空区间
pub fn validate_range(from: u64, to: u64) -> Result<()> {
    if from <= to && to > MAX_PAK_INDEX {
        anyhow::bail!("编号 {} 超出8位上限 {}", to, MAX_PAK_INDEX);
    }
    Ok(())
}

pub fn validate_output_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        anyhow::bail!("outputPath 不能为空");
    }
    Ok(())
}

pub fn validate_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        anyhow::bail!("timeoutSecs 必须大于0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://127.0.0.1:8080/patches"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("invalid-url"));
        assert!(validate_base_url("").is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(validate_range(1, 3).is_ok());
        assert!(validate_range(0, MAX_PAK_INDEX).is_ok());
        assert!(validate_range(5, 3).is_ok());
        assert!(validate_range(1, MAX_PAK_INDEX + 1).is_err());
    }

    #[test]
    fn test_output_path_validation() {
        assert!(validate_output_path("./downloads").is_ok());
        assert!(validate_output_path("  ").is_err());
    }

    #[test]
    fn test_timeout_validation() {
        assert!(validate_timeout(30).is_ok());
        assert!(validate_timeout(0).is_err());
    }
}
