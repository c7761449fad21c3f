use crate::{Configuration, DAY_END, EntryKey, TimeEntry, increment::Increment};

impl TimeEntry {
    /// 根据配置构建基础条目
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let (start_time, end_time) = if configuration.all_day {
            (None, None)
        } else {
            let end_time = match configuration.end_time {
                0 => DAY_END,
                end_time => end_time,
            };
            (Some(configuration.start_time), Some(end_time))
        };

        Self {
            pid: configuration.pid,
            start_date: configuration.start_date,
            end_date: configuration.end_date.or(configuration.start_date),
            start_time,
            end_time,
            all_day: configuration.all_day,
            state: configuration.state.clone(),
        }
    }

    /// 计算去重键
    pub fn key(&self) -> EntryKey {
        EntryKey {
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            state: self.state.clone(),
            pid: self.pid,
        }
    }

    /// 将开始和结束日期同时推进一个增量，时间部分不变
    ///
    /// 没有具体日期或日期溢出时返回 `None`。
    pub fn advanced(&self, increment: Increment) -> Option<Self> {
        let start_date = increment.apply(self.start_date?)?;
        let end_date = match self.end_date {
            Some(end_date) => Some(increment.apply(end_date)?),
            None => None,
        };

        Some(Self {
            start_date: Some(start_date),
            end_date,
            ..self.clone()
        })
    }
}
