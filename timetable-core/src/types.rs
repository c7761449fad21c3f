use std::{collections::BTreeMap, fmt, path::Path};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 一天的秒数
pub const SECONDS_DAY: u32 = 86_400;

/// 结束时间为 0 时使用的哨兵值，表示当天结束 (23:59:59)
pub const DAY_END: u32 = SECONDS_DAY - 1;

/// 固定间隔的重复频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// 按位置的重复规则，例如“每月第二个星期二”
///
/// 只在 [`Frequency::Monthly`] 和 [`Frequency::Yearly`] 下生效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last,
    NextToLast,
    ThirdLast,
}

impl Recurrence {
    /// 位置序号：正数从月初往后数，负数从月末往前数，`None` 返回 0
    pub const fn ordinal(self) -> i8 {
        match self {
            Self::None => 0,
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Last => -1,
            Self::NextToLast => -2,
            Self::ThirdLast => -3,
        }
    }
}

/// 单个重复事件的配置
///
/// 除开始日期外的字段都有默认值，方便直接从 JSON 读取。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// 所属容器 id
    pub pid: u32,
    /// 开始日期
    pub start_date: Option<NaiveDate>,
    /// 结束日期，缺省时等于开始日期
    pub end_date: Option<NaiveDate>,
    /// 开始时间 (当天的秒数)
    pub start_time: u32,
    /// 结束时间 (当天的秒数)，0 表示当天结束
    pub end_time: u32,
    /// 是否全天
    pub all_day: bool,
    /// 状态标记
    pub state: String,
    /// 重复频率
    pub frequency: Frequency,
    /// 按位置的重复规则
    pub recurrence: Recurrence,
    /// 重复规则对应的星期几
    pub day: Option<Weekday>,
    /// 重复间隔 (每N天/周/月/年)，小于等于1时按1处理
    pub counter_interval: i32,
    /// 重复次数上限，0 表示不限
    pub counter_amount: u32,
    /// 截止日期
    pub till_date: Option<NaiveDate>,
    /// 相对开始日期的截止天数
    pub till_days: Option<u32>,
}

impl Configuration {
    /// 从JSON字符串读取配置，支持单个对象或对象数组
    pub fn list_from_json(json_data: &str) -> Result<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(json_data)?;
        let configurations = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(configurations)
    }

    /// 从文件读取配置
    pub fn list_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|err| {
            Error::Config(format!("无法读取配置文件 {}: {}", path_ref.display(), err))
        })?;
        Self::list_from_json(&content)
    }

    /// 规范化后的重复间隔
    pub fn interval(&self) -> u32 {
        u32::try_from(self.counter_interval).map_or(1, |interval| interval.max(1))
    }

    /// 实际生效的截止日期，`till_date` 与 `till_days` 取较早者
    pub fn cutoff(&self) -> Option<NaiveDate> {
        let relative = self.till_days.and_then(|days| {
            self.start_date?
                .checked_add_days(chrono::Days::new(u64::from(days)))
        });
        match (self.till_date, relative) {
            (Some(absolute), Some(relative)) => Some(absolute.min(relative)),
            (absolute, relative) => absolute.or(relative),
        }
    }
}

/// 生成的单个时间条目
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeEntry {
    pub pid: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 全天条目为 `None`
    pub start_time: Option<u32>,
    /// 全天条目为 `None`
    pub end_time: Option<u32>,
    pub all_day: bool,
    pub state: String,
}

/// 时间条目的去重键
///
/// 字段顺序决定排序：先按开始日期，所以 [`TimeTable`] 按时间先后迭代。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<u32>,
    pub end_time: Option<u32>,
    pub all_day: bool,
    pub state: String,
    pub pid: u32,
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |value| value.to_string())
        }

        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}",
            self.pid,
            part(self.start_date),
            part(self.end_date),
            part(self.start_time),
            part(self.end_time),
            u8::from(self.all_day),
            self.state
        )
    }
}

/// 输出集合：去重键到时间条目的映射
pub type TimeTable = BTreeMap<EntryKey, TimeEntry>;
