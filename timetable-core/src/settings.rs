use std::{env, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 单个配置最多展开的条目数的默认值
pub const DEFAULT_FREQUENCY_LIMIT_PER_ITEM: u32 = 300;

/// 读取上限的环境变量
pub const FREQUENCY_LIMIT_ENV: &str = "TIMETABLE_FREQUENCY_LIMIT";

/// 引擎读取外部配置的接口
pub trait ConfigReader: Send + Sync {
    /// 原始配置值，未配置时为 `None`
    fn raw_frequency_limit_per_item(&self) -> Option<i64>;

    /// 每个配置最多展开的条目数，配置值小于等于0时回退到 300
    fn frequency_limit_per_item(&self) -> u32 {
        self.raw_frequency_limit_per_item()
            .filter(|limit| *limit > 0)
            .map_or(DEFAULT_FREQUENCY_LIMIT_PER_ITEM, |limit| {
                u32::try_from(limit).unwrap_or(u32::MAX)
            })
    }
}

/// 引擎设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub frequency_limit_per_item: Option<i64>,
}

impl Settings {
    pub const fn with_frequency_limit(limit: i64) -> Self {
        Self {
            frequency_limit_per_item: Some(limit),
        }
    }

    /// 从JSON字符串加载设置
    pub fn from_json(json_data: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_data)?)
    }

    /// 从文件加载设置
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|err| {
            Error::Config(format!("无法读取设置文件 {}: {}", path_ref.display(), err))
        })?;
        Self::from_json(&content)
    }

    /// 从环境变量加载设置，未设置时使用默认值
    pub fn from_env() -> Result<Self> {
        match env::var(FREQUENCY_LIMIT_ENV) {
            Ok(raw) => Self::parse_limit(&raw).map(Self::with_frequency_limit),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(err) => Err(Error::Config(format!("{FREQUENCY_LIMIT_ENV}: {err}"))),
        }
    }

    fn parse_limit(raw: &str) -> Result<i64> {
        raw.trim()
            .parse()
            .map_err(|err| Error::Config(format!("{FREQUENCY_LIMIT_ENV}={raw}: {err}")))
    }
}

impl ConfigReader for Settings {
    fn raw_frequency_limit_per_item(&self) -> Option<i64> {
        self.frequency_limit_per_item
    }
}
