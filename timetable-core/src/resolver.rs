use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::Recurrence;

/// 查找下一个日期时跳过的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveUnit {
    /// 下个月
    Month,
    /// 明年同月
    Year,
}

/// 按位置重复规则查找下一个日期
pub trait DateResolver: Send + Sync {
    /// 返回参考日期之后的下一个满足规则的日期，不存在时返回 `None`
    fn resolve_next(
        &self,
        reference: NaiveDate,
        recurrence: Recurrence,
        day: Weekday,
        unit: ResolveUnit,
    ) -> Option<NaiveDate>;
}

/// 默认实现：在目标月份里找“第N个星期X”
///
/// 目标月份不存在该位置时（例如只有四个星期一的月份里的第五个星期一）返回 `None`。
#[derive(Debug, Clone, Copy, Default)]
pub struct NthWeekdayResolver;

impl NthWeekdayResolver {
    /// 指定月份中第 `ordinal` 个 `day`，负数从月末往前数
    pub fn nth_weekday_of_month(
        year: i32,
        month: u32,
        day: Weekday,
        ordinal: i8,
    ) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let date = match ordinal {
            0 => return None,
            n if n > 0 => {
                let offset =
                    (7 + day.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
                let days = u64::from(offset) + 7 * (u64::from(n.unsigned_abs()) - 1);
                first.checked_add_days(Days::new(days))?
            }
            n => {
                let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
                let offset =
                    (7 + last.weekday().num_days_from_monday() - day.num_days_from_monday()) % 7;
                let days = u64::from(offset) + 7 * (u64::from(n.unsigned_abs()) - 1);
                last.checked_sub_days(Days::new(days))?
            }
        };

        (date.month() == month && date.year() == year).then_some(date)
    }
}

impl DateResolver for NthWeekdayResolver {
    fn resolve_next(
        &self,
        reference: NaiveDate,
        recurrence: Recurrence,
        day: Weekday,
        unit: ResolveUnit,
    ) -> Option<NaiveDate> {
        let month_start = reference.with_day(1)?;
        let target = match unit {
            ResolveUnit::Month => month_start.checked_add_months(Months::new(1))?,
            ResolveUnit::Year => month_start.checked_add_months(Months::new(12))?,
        };
        Self::nth_weekday_of_month(target.year(), target.month(), day, recurrence.ordinal())
    }
}
