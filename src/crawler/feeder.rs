use crate::error::{Error, Result};
use reqwest::Url;

pub const SEARCH_URL: &str = "https://www.google.com/search";
/// 検索結果1ページあたりの画像数
pub const IMAGES_PER_PAGE: usize = 100;

/// 検索結果ページのURLを生成する
pub fn search_page_urls(search_url: &str, keyword: &str, max_num: usize) -> Result<Vec<Url>> {
    let pages = max_num.div_ceil(IMAGES_PER_PAGE);
    (0..pages)
        .map(|page| {
            let ijn = page.to_string();
            let start = (page * IMAGES_PER_PAGE).to_string();
            Url::parse_with_params(
                search_url,
                &[
                    ("q", keyword),
                    ("ijn", ijn.as_str()),
                    ("start", start.as_str()),
                    ("tbm", "isch"),
                ],
            )
            .map_err(|e| Error::InvalidUrl {
                url: search_url.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}
