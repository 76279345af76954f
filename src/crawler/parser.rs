use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 画像URLとして受け付ける拡張子
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

// URLらしいトークン全体（拡張子の判定はパース後に行う）
fn url_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"https?://[^\s"'<>\[\]\\]+"#).expect("url token pattern is valid")
    })
}

/// Google自身のホスト（サムネイル等）は除外する
fn is_google_host(url: &Url) -> bool {
    let host = url.host_str().unwrap_or("");
    ["gstatic.com", "google.com"]
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

/// パスの末尾が画像の拡張子かどうか
fn has_image_extension(url: &Url) -> bool {
    url.path()
        .rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// スクリプト内でエスケープされた文字を戻す
fn unescape(html: &str) -> String {
    html.replace("\\u003d", "=")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
}

/// 検索結果ページのHTMLから画像URLを抽出する
pub fn parse_image_urls(html: &str) -> Vec<String> {
    let text = unescape(html);
    let mut seen = HashSet::new();
    url_token_pattern()
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|token| {
            Url::parse(token)
                .map(|url| has_image_extension(&url) && !is_google_host(&url))
                .unwrap_or(false)
        })
        .filter(|token| seen.insert(token.to_string()))
        .map(str::to_string)
        .collect()
}
