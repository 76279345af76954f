use image_crawler::{convert_directory, Config, GoogleImageCrawler};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // コマンドライン引数からコンフィグファイルのパスを取得（省略時は組み込みの定数）
    let config_path = env::args().nth(1).map(|s| s.into());
    let config = Config::load(config_path)?;

    // 画像の収集
    let crawler = GoogleImageCrawler::new(config.storage.clone(), config.downloader_threads)?;
    let summary = crawler.crawl(&config.keyword, config.max_num).await?;
    info!(downloaded = summary.downloaded, requested = summary.requested, "download step done");

    // PNGをJPEGに変換
    let converted = convert_directory(&config.storage.root_dir)?;
    info!(converted = converted.len(), "conversion step done");

    Ok(())
}
