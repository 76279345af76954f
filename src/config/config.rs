use crate::config::storage::Storage;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 検索キーワード
pub const KEYWORD: &str = "panda";
/// ダウンロードする画像の最大枚数
pub const MAX_NUM: usize = 3000;
/// ダウンロードの並列数
pub const DOWNLOADER_THREADS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 検索キーワード
    #[serde(default = "default_keyword")]
    pub keyword: String,
    /// ダウンロードする画像の最大枚数
    #[serde(default = "default_max_num")]
    pub max_num: usize,
    /// ダウンロードの並列数
    #[serde(default = "default_downloader_threads")]
    pub downloader_threads: usize,
    /// 保存先
    #[serde(default)]
    pub storage: Storage,
}

fn default_keyword() -> String {
    KEYWORD.to_string()
}

fn default_max_num() -> usize {
    MAX_NUM
}

fn default_downloader_threads() -> usize {
    DOWNLOADER_THREADS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            max_num: default_max_num(),
            downloader_threads: default_downloader_threads(),
            storage: Storage::default(),
        }
    }
}

impl Config {
    /// コンフィグを読み込む
    ///
    /// パスが指定されなければ組み込みの定数を使う。
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                // コンフィグファイルを読み込む
                let config_str = std::fs::read_to_string(&path)?;
                serde_json::from_str(&config_str)?
            }
            None => Config::default(),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keyword.trim().is_empty() {
            return Err(Error::InvalidConfig("keyword must not be empty".into()));
        }
        if self.max_num == 0 {
            return Err(Error::InvalidConfig("max_num must be at least 1".into()));
        }
        if self.downloader_threads == 0 {
            return Err(Error::InvalidConfig(
                "downloader_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
