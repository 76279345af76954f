use crate::error::{Error, Result};
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// 1リクエストあたりのタイムアウト
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// 1つのURLに対する最大試行回数
pub const MAX_RETRY: usize = 3;
/// 拡張子が判別できない場合に使う拡張子
pub const DEFAULT_EXTENSION: &str = "jpg";
/// URLの拡張子をそのまま使う画像形式
const KNOWN_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "bmp", "tiff", "gif", "ppm", "pgm"];

/// 保存するファイル名を決める（例: 000001.png）
pub fn file_name(index: usize, url: &str) -> String {
    let extension = Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path()
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
        })
        .filter(|ext| KNOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{:06}.{}", index, extension)
}

struct Shared {
    client: Client,
    root_dir: PathBuf,
    max_num: usize,
    fetched: AtomicUsize,
}

impl Shared {
    fn reached_max(&self) -> bool {
        self.fetched.load(Ordering::SeqCst) >= self.max_num
    }

    /// 保存枠を1つ確保して連番を返す。上限に達していればNone
    fn reserve_index(&self) -> Option<usize> {
        self.fetched
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_num).then_some(n + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        // 画像として認識できないものは失敗扱い
        image::guess_format(&body)?;
        Ok(body.to_vec())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 1;
        loop {
            match self.try_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < MAX_RETRY => {
                    debug!(url, attempt, error = %e, "download attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// ダウンロードタスクを受け取るワーカーのプール
pub struct ImageDownloader {
    sender: mpsc::Sender<String>,
    workers: JoinSet<Result<()>>,
    shared: Arc<Shared>,
}

impl ImageDownloader {
    /// `threads`個のワーカーを起動する
    pub fn spawn(client: Client, root_dir: &Path, max_num: usize, threads: usize) -> Self {
        let shared = Arc::new(Shared {
            client,
            root_dir: root_dir.to_path_buf(),
            max_num,
            fetched: AtomicUsize::new(0),
        });
        let threads = threads.max(1);
        let (sender, receiver) = mpsc::channel(threads * 2);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = JoinSet::new();
        for id in 0..threads {
            workers.spawn(worker(id, Arc::clone(&receiver), Arc::clone(&shared)));
        }

        Self {
            sender,
            workers,
            shared,
        }
    }

    pub fn reached_max(&self) -> bool {
        self.shared.reached_max()
    }

    /// URLをキューに積む。ワーカーが全員終了していればfalse
    pub async fn push(&self, url: String) -> bool {
        self.sender.send(url).await.is_ok()
    }

    /// キューを閉じて全ワーカーの終了を待ち、保存した枚数を返す
    pub async fn join(self) -> Result<usize> {
        let Self {
            sender,
            mut workers,
            shared,
        } = self;
        drop(sender);

        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined.map_err(Error::from).and_then(|r| r) {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(shared.fetched.load(Ordering::SeqCst).min(shared.max_num)),
        }
    }
}

async fn worker(
    id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<String>>>,
    shared: Arc<Shared>,
) -> Result<()> {
    loop {
        if shared.reached_max() {
            break;
        }
        let next = receiver.lock().await.recv().await;
        let Some(url) = next else {
            break;
        };

        let body = match shared.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(worker = id, url = %url, error = %e, "failed to download image");
                continue;
            }
        };

        let Some(index) = shared.reserve_index() else {
            break;
        };
        let path = shared.root_dir.join(file_name(index, &url));
        tokio::fs::write(&path, &body).await?;
        info!(worker = id, index, path = %path.display(), "image downloaded");
    }
    debug!(worker = id, "downloader worker finished");
    Ok(())
}
