pub mod downloader;
pub mod feeder;
pub mod parser;

use crate::config::Storage;
use crate::error::{Error, Result};
use downloader::{ImageDownloader, REQUEST_TIMEOUT};
use feeder::{search_page_urls, SEARCH_URL};
use parser::parse_image_urls;
use reqwest::{Client, Url};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// 要求した最大枚数
    pub requested: usize,
    /// 実際に保存した枚数
    pub downloaded: usize,
}

/// Google画像検索から画像を集めるクローラ
pub struct GoogleImageCrawler {
    client: Client,
    storage: Storage,
    downloader_threads: usize,
    search_url: String,
}

impl GoogleImageCrawler {
    pub fn new(storage: Storage, downloader_threads: usize) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            storage,
            downloader_threads,
            search_url: SEARCH_URL.to_string(),
        })
    }

    /// 検索エンドポイントを差し替える
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// キーワードで検索し、最大`max_num`枚の画像を保存先に保存する
    pub async fn crawl(&self, keyword: &str, max_num: usize) -> Result<CrawlSummary> {
        let root_dir = &self.storage.root_dir;
        info!(keyword, max_num, root_dir = %root_dir.display(), "start crawling");
        tokio::fs::create_dir_all(root_dir).await?;

        let pool = ImageDownloader::spawn(
            self.client.clone(),
            root_dir,
            max_num,
            self.downloader_threads,
        );

        let mut seen = HashSet::new();
        'pages: for page_url in search_page_urls(&self.search_url, keyword, max_num)? {
            if pool.reached_max() {
                break;
            }
            let html = self.fetch_page(&page_url).await?;
            let new_urls: Vec<String> = parse_image_urls(&html)
                .into_iter()
                .filter(|url| seen.insert(url.clone()))
                .collect();
            debug!(page = %page_url, found = new_urls.len(), "parsed search page");

            // 新しいURLが無ければ結果の終端
            if new_urls.is_empty() {
                break;
            }
            for url in new_urls {
                if !pool.push(url).await {
                    break 'pages;
                }
            }
        }

        let downloaded = pool.join().await?;
        if seen.is_empty() {
            return Err(Error::NoResults(keyword.to_string()));
        }
        if downloaded < max_num {
            warn!(keyword, downloaded, max_num, "fewer images than requested");
        }
        info!(keyword, downloaded, "crawling finished");

        Ok(CrawlSummary {
            requested: max_num,
            downloaded,
        })
    }

    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
