use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{SECONDS_DAY, TimeEntry};

/// 提示消息的严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// 显示用的名称
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "警告",
            Self::Error => "错误",
        }
    }
}

/// 基础条目中的逻辑错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// 开始日期晚于结束日期
    WrongDate,
    /// 同一天内开始时间晚于结束时间
    WrongTime,
}

impl Warning {
    pub const fn severity(self) -> Severity {
        Severity::Error
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::WrongDate => "日期范围错误",
            Self::WrongTime => "时间范围错误",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::WrongDate => "开始日期晚于结束日期，请检查配置。",
            Self::WrongTime => "同一天内开始时间晚于结束时间，请检查配置。",
        }
    }
}

/// 提示消息的接收方
///
/// 只负责投递，不能把错误抛回调用方。
pub trait WarningSink: Send + Sync {
    fn notify(&self, severity: Severity, title: &str, message: &str);
}

/// 通过 tracing 输出提示消息
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        match severity {
            Severity::Error => tracing::error!(title, "{}", message),
            Severity::Warning => tracing::warn!(title, "{}", message),
        }
    }
}

/// 收到的一条提示消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// 把提示消息收集到内存中，克隆后共享同一个列表
#[derive(Debug, Clone, Default)]
pub struct CollectingWarningSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingWarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收到的提示消息
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications
            .lock()
            .map(|guard| guard.is_empty())
            .unwrap_or(true)
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.notifications.lock() {
            guard.clear();
        }
    }
}

impl WarningSink for CollectingWarningSink {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        if let Ok(mut guard) = self.notifications.lock() {
            guard.push(Notification {
                severity,
                title: title.to_string(),
                message: message.to_string(),
            });
        }
    }
}

/// 检查基础条目的逻辑错误，最多返回一个
///
/// 日期不完整时不做检查；日期范围检查优先于时间范围检查。
pub fn validate_base_entry(entry: &TimeEntry) -> Option<Warning> {
    let (Some(start_date), Some(end_date)) = (entry.start_date, entry.end_date) else {
        return None;
    };

    if start_date > end_date {
        return Some(Warning::WrongDate);
    }

    let start_time = entry.start_time.unwrap_or(0) % SECONDS_DAY;
    let end_time = entry.end_time.unwrap_or(0) % SECONDS_DAY;
    if !entry.all_day && start_date == end_date && start_time > end_time {
        return Some(Warning::WrongTime);
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Configuration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(start: NaiveDate, end: NaiveDate, start_time: u32, end_time: u32) -> TimeEntry {
        TimeEntry::from_configuration(&Configuration {
            start_date: Some(start),
            end_date: Some(end),
            start_time,
            end_time,
            ..Default::default()
        })
    }

    #[test]
    fn reversed_dates_are_reported() {
        let mut reversed = entry(date(2024, 3, 10), date(2024, 3, 5), 0, 0);
        reversed.all_day = true;
        assert_eq!(validate_base_entry(&reversed), Some(Warning::WrongDate));
    }

    #[test]
    fn date_check_takes_precedence() {
        let reversed = entry(date(2024, 3, 10), date(2024, 3, 5), 14 * 3600, 9 * 3600);
        assert_eq!(validate_base_entry(&reversed), Some(Warning::WrongDate));
    }

    #[test]
    fn same_day_reversed_times_are_reported() {
        let day = date(2024, 3, 10);
        assert_eq!(
            validate_base_entry(&entry(day, day, 14 * 3600, 9 * 3600)),
            Some(Warning::WrongTime)
        );
        assert_eq!(validate_base_entry(&entry(day, day, 14 * 3600, 18 * 3600)), None);
    }

    #[test]
    fn reversed_times_across_days_are_fine() {
        let entry = entry(date(2024, 3, 10), date(2024, 3, 11), 22 * 3600, 2 * 3600);
        assert_eq!(validate_base_entry(&entry), None);
    }

    #[test]
    fn incomplete_dates_are_skipped() {
        let entry = TimeEntry::from_configuration(&Configuration {
            start_time: 14 * 3600,
            end_time: 9 * 3600,
            ..Default::default()
        });
        assert_eq!(validate_base_entry(&entry), None);
    }

    #[test]
    fn collecting_sink_shares_notifications() {
        let sink = CollectingWarningSink::new();
        let shared = sink.clone();
        let warning = Warning::WrongTime;
        sink.notify(warning.severity(), warning.title(), warning.message());

        assert_eq!(shared.notifications().len(), 1);
        assert_eq!(shared.notifications()[0].title, "时间范围错误");
        shared.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn sinks_keep_the_given_severity() {
        let sink = CollectingWarningSink::new();
        for severity in [Severity::Warning, Severity::Error] {
            TracingWarningSink.notify(severity, severity.label(), "条目已跳过");
            sink.notify(severity, severity.label(), "条目已跳过");
        }

        let severities: Vec<_> = sink
            .notifications()
            .into_iter()
            .map(|notification| (notification.severity, notification.title))
            .collect();
        assert_eq!(
            severities,
            vec![
                (Severity::Warning, "警告".to_string()),
                (Severity::Error, "错误".to_string()),
            ]
        );
        assert_eq!(Warning::WrongDate.severity(), Severity::Error);
    }
}
