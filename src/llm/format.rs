//! 端点 URL 构建工具

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();

    // 修复双斜杠（跳过协议部分）
    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 OpenAI Chat Completions 端点
pub fn build_openai_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(fix_base_url("https://api.openai.com/"), "https://api.openai.com");
        assert_eq!(fix_base_url("https://api.openai.com//v1"), "https://api.openai.com/v1");
        assert_eq!(fix_base_url(" http://127.0.0.1:9000/ "), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_build_openai_endpoint() {
        assert_eq!(
            build_openai_endpoint("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://api.openai.com/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
