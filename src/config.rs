//! 配置加载模块 - 从 .env 文件和进程环境变量读取配置
//!
//! 进程环境变量优先于文件值，文件不存在不是错误（视为未配置）。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 配置映射
///
/// 在 `main` 中构建一次，之后只读传引用给各组件使用。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// 从 .env 文件加载的键值对
    vars: HashMap<String, String>,
}

impl Config {
    /// 从默认位置加载配置
    ///
    /// 查找顺序：可执行文件同目录的 `.env`，其次 `~/.config/ai-task-notify/.env`。
    pub fn load() -> Self {
        for candidate in Self::default_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }
        Self::default()
    }

    /// 从指定文件加载配置
    ///
    /// 跳过空行和 `#` 注释行，按第一个 `=` 分割，键和值两端去空白。
    /// 文件不存在或不可读时返回空配置。
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        let mut vars = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                vars.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Self { vars }
    }

    /// 用于测试的直接构造
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// 默认 .env 候选路径
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                paths.push(dir.join(".env"));
            }
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config/ai-task-notify/.env"));
        }
        paths
    }

    /// 获取配置值，进程环境变量优先于文件值
    pub fn get(&self, key: &str) -> Option<String> {
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
        self.vars.get(key).cloned()
    }

    /// 获取配置值，缺失时返回默认值
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// 获取启用的通知渠道列表
    ///
    /// 解析 `NOTIFY_CHANNELS`：按逗号分割，去空白，转小写，丢弃空项。
    /// 保持原始顺序，不去重。
    pub fn enabled_channels(&self) -> Vec<String> {
        let channels = self.get_or("NOTIFY_CHANNELS", "");
        channels
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }
}
