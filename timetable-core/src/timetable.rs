use chrono::NaiveDate;

use crate::{
    Configuration, Frequency, Recurrence, TimeEntry, TimeTable,
    increment::Increment,
    resolver::{DateResolver, NthWeekdayResolver, ResolveUnit},
    settings::{ConfigReader, Settings},
    validate::{TracingWarningSink, WarningSink, validate_base_entry},
};

/// 时间表生成器
///
/// 把单个重复事件配置展开成具体的时间条目。协作方（提示消息、外部配置、日期查找）
/// 在构造时注入，生成器本身没有可变状态。
pub struct TimeTableGenerator {
    sink: Box<dyn WarningSink>,
    config: Box<dyn ConfigReader>,
    resolver: Box<dyn DateResolver>,
}

impl TimeTableGenerator {
    pub fn new(
        sink: Box<dyn WarningSink>,
        config: Box<dyn ConfigReader>,
        resolver: Box<dyn DateResolver>,
    ) -> Self {
        Self {
            sink,
            config,
            resolver,
        }
    }

    pub fn with_sink(mut self, sink: impl WarningSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_config(mut self, config: impl ConfigReader + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    pub fn with_resolver(mut self, resolver: impl DateResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// 把配置展开到给定的时间表中
    ///
    /// 至少插入基础条目。配置中的逻辑错误只会产生提示消息，不会中断展开。
    pub fn handle_configuration(&self, times: &mut TimeTable, configuration: &Configuration) {
        let base_entry = TimeEntry::from_configuration(configuration);
        self.validate_base_entry(&base_entry);

        let before = times.len();
        times.insert(base_entry.key(), base_entry.clone());
        self.add_frequency_items(times, configuration, &base_entry);
        self.add_recurrence_items(times, configuration, &base_entry);

        tracing::debug!(
            "展开配置: pid={}, frequency={:?}, recurrence={:?}, 新增条目={}",
            configuration.pid,
            configuration.frequency,
            configuration.recurrence,
            times.len().saturating_sub(before)
        );
    }

    /// 把配置展开到一个新的时间表中
    pub fn expand(&self, configuration: &Configuration) -> TimeTable {
        let mut times = TimeTable::new();
        self.handle_configuration(&mut times, configuration);
        times
    }

    /// 每个配置最多展开的条目数
    pub fn frequency_limit_per_item(&self) -> u32 {
        self.config.frequency_limit_per_item()
    }

    fn validate_base_entry(&self, base_entry: &TimeEntry) {
        if let Some(warning) = validate_base_entry(base_entry) {
            self.sink.notify(warning.severity(), warning.title(), warning.message());
        }
    }

    fn add_frequency_items(
        &self,
        times: &mut TimeTable,
        configuration: &Configuration,
        base_entry: &TimeEntry,
    ) {
        let Some(increment) = Increment::for_configuration(configuration) else {
            return;
        };

        self.expand_loop(times, configuration, base_entry, |last| {
            last.advanced(increment)
        });
    }

    fn add_recurrence_items(
        &self,
        times: &mut TimeTable,
        configuration: &Configuration,
        base_entry: &TimeEntry,
    ) {
        if configuration.recurrence == Recurrence::None {
            return;
        }
        let Some(day) = configuration.day else {
            return;
        };
        let unit = match configuration.frequency {
            Frequency::Monthly => ResolveUnit::Month,
            Frequency::Yearly => ResolveUnit::Year,
            _ => return,
        };

        self.expand_loop(times, configuration, base_entry, |last| {
            let start_date = last.start_date?;
            let recurrence = configuration.recurrence;
            let Some(next) = self.resolver.resolve_next(start_date, recurrence, day, unit) else {
                tracing::trace!("没有找到 {} 之后满足重复规则的日期", start_date);
                return None;
            };
            let delta = next.signed_duration_since(start_date).num_days();
            last.advanced(Increment::days(delta)?)
        });
    }

    /// 展开循环：受条目上限、重复次数和截止日期约束
    ///
    /// `next` 返回 `None` 时结束循环。
    fn expand_loop<F>(
        &self,
        times: &mut TimeTable,
        configuration: &Configuration,
        base_entry: &TimeEntry,
        mut next: F,
    ) where
        F: FnMut(&TimeEntry) -> Option<TimeEntry>,
    {
        let amount_counter = configuration.counter_amount;
        let till_date = configuration.cutoff();
        let max_limit = self.frequency_limit_per_item();

        let mut last_loop = base_entry.clone();
        let mut i = 0;
        while i < max_limit && (amount_counter == 0 || i < amount_counter) {
            let Some(loop_entry) = next(&last_loop) else {
                break;
            };

            if exceeds(loop_entry.start_date, till_date) {
                tracing::trace!("超过截止日期 {:?}，停止展开", till_date);
                break;
            }

            times.insert(loop_entry.key(), loop_entry.clone());
            last_loop = loop_entry;
            i += 1;
        }
    }
}

fn exceeds(start_date: Option<NaiveDate>, till_date: Option<NaiveDate>) -> bool {
    matches!((start_date, till_date), (Some(start), Some(till)) if start > till)
}

impl Default for TimeTableGenerator {
    fn default() -> Self {
        Self::new(
            Box::new(TracingWarningSink),
            Box::new(Settings::default()),
            Box::new(NthWeekdayResolver),
        )
    }
}
