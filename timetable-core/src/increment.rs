use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Configuration, Frequency, Recurrence};

/// 日历增量的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementUnit {
    Day,
    Week,
    Month,
    Year,
}

/// 增量方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Forward,
    Backward,
}

/// 日历增量，例如“+2 周”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Increment {
    pub unit: IncrementUnit,
    pub count: u32,
    pub sign: Sign,
}

impl Increment {
    pub const fn forward(unit: IncrementUnit, count: u32) -> Self {
        Self {
            unit,
            count,
            sign: Sign::Forward,
        }
    }

    /// 按有符号天数构造增量
    pub fn days(delta: i64) -> Option<Self> {
        let count = u32::try_from(delta.unsigned_abs()).ok()?;
        let sign = if delta < 0 {
            Sign::Backward
        } else {
            Sign::Forward
        };
        Some(Self {
            unit: IncrementUnit::Day,
            count,
            sign,
        })
    }

    /// 根据配置计算固定频率的增量
    ///
    /// 月/年频率配合按位置的重复规则时由重复展开器处理，这里返回 `None`。
    pub fn for_configuration(configuration: &Configuration) -> Option<Self> {
        let interval = configuration.interval();
        let unit = match configuration.frequency {
            Frequency::Daily => IncrementUnit::Day,
            Frequency::Weekly => IncrementUnit::Week,
            Frequency::Monthly if configuration.recurrence == Recurrence::None => {
                IncrementUnit::Month
            }
            Frequency::Yearly if configuration.recurrence == Recurrence::None => {
                IncrementUnit::Year
            }
            _ => return None,
        };
        Some(Self::forward(unit, interval))
    }

    /// 将增量应用到日期上，溢出时返回 `None`
    ///
    /// 月和年的增量保留日号，目标月份没有这一天时多出的天数顺延到下个月
    /// (2024-01-31 加一个月得到 2024-03-02)。
    pub fn apply(self, date: NaiveDate) -> Option<NaiveDate> {
        let count = u64::from(self.count);
        match (self.unit, self.sign) {
            (IncrementUnit::Day, Sign::Forward) => date.checked_add_days(Days::new(count)),
            (IncrementUnit::Day, Sign::Backward) => date.checked_sub_days(Days::new(count)),
            (IncrementUnit::Week, Sign::Forward) => date.checked_add_days(Days::new(count * 7)),
            (IncrementUnit::Week, Sign::Backward) => date.checked_sub_days(Days::new(count * 7)),
            (IncrementUnit::Month, sign) => shift_months(date, self.count, sign),
            (IncrementUnit::Year, sign) => shift_months(date, self.count.checked_mul(12)?, sign),
        }
    }
}

/// 按月移动日期，日号超出目标月份时顺延
fn shift_months(date: NaiveDate, months: u32, sign: Sign) -> Option<NaiveDate> {
    let month_start = date.with_day(1)?;
    let target = match sign {
        Sign::Forward => month_start.checked_add_months(Months::new(months))?,
        Sign::Backward => month_start.checked_sub_months(Months::new(months))?,
    };
    target.checked_add_days(Days::new(u64::from(date.day0())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_defaults_to_one() {
        let mut configuration = Configuration {
            frequency: Frequency::Weekly,
            counter_interval: -3,
            ..Default::default()
        };
        assert_eq!(
            Increment::for_configuration(&configuration),
            Some(Increment::forward(IncrementUnit::Week, 1))
        );

        configuration.counter_interval = 2;
        assert_eq!(
            Increment::for_configuration(&configuration),
            Some(Increment::forward(IncrementUnit::Week, 2))
        );
    }

    #[test]
    fn positional_recurrence_has_no_fixed_increment() {
        for frequency in [Frequency::Monthly, Frequency::Yearly] {
            let configuration = Configuration {
                frequency,
                recurrence: Recurrence::Second,
                ..Default::default()
            };
            assert_eq!(Increment::for_configuration(&configuration), None);
        }

        let configuration = Configuration::default();
        assert_eq!(Increment::for_configuration(&configuration), None);
    }

    #[test]
    fn month_steps_overflow_into_next_month() {
        let increment = Increment::forward(IncrementUnit::Month, 1);
        assert_eq!(increment.apply(date(2024, 1, 31)), Some(date(2024, 3, 2)));
        assert_eq!(increment.apply(date(2023, 1, 31)), Some(date(2023, 3, 3)));
        assert_eq!(increment.apply(date(2024, 3, 2)), Some(date(2024, 4, 2)));
        assert_eq!(increment.apply(date(2024, 12, 15)), Some(date(2025, 1, 15)));

        let back = Increment {
            sign: Sign::Backward,
            ..increment
        };
        assert_eq!(back.apply(date(2024, 3, 31)), Some(date(2024, 3, 2)));

        let yearly = Increment::forward(IncrementUnit::Year, 1);
        assert_eq!(yearly.apply(date(2024, 2, 29)), Some(date(2025, 3, 1)));
        assert_eq!(yearly.apply(date(2024, 6, 1)), Some(date(2025, 6, 1)));
    }

    #[test]
    fn signed_day_increments() {
        let back = Increment::days(-3).unwrap();
        assert_eq!(back.sign, Sign::Backward);
        assert_eq!(back.apply(date(2024, 3, 1)), Some(date(2024, 2, 27)));

        let forward = Increment::days(35).unwrap();
        assert_eq!(forward.apply(date(2024, 1, 9)), Some(date(2024, 2, 13)));
    }

    #[test]
    fn overflow_yields_none() {
        let increment = Increment::forward(IncrementUnit::Year, 1);
        assert_eq!(increment.apply(NaiveDate::MAX), None);
    }
}
