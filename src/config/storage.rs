use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 保存先ディレクトリのプレフィックス
pub const DIRECTORY_PREFIX: &str = "data/collected/";
/// 保存先のサブフォルダ名
pub const DIRECTORY_NAME: &str = "img";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    /// 画像の保存先ディレクトリ（変換もこのディレクトリで行う）
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(DIRECTORY_PREFIX).join(DIRECTORY_NAME)
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
        }
    }
}

impl Storage {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}
