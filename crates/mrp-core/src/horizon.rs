//! 計劃時段

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{MrpError, PeriodId, Result};

/// 時間分桶策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketingStrategy {
    /// 每日分桶
    Daily,
    /// 每週分桶
    Weekly,
    /// 每月分桶
    Monthly,
}

impl BucketingStrategy {
    fn label(self) -> &'static str {
        match self {
            BucketingStrategy::Daily => "Day",
            BucketingStrategy::Weekly => "Week",
            BucketingStrategy::Monthly => "Month",
        }
    }

    /// 第 `offset` 個時段的起始日
    fn bucket_start(self, start: NaiveDate, offset: u32) -> Option<NaiveDate> {
        match self {
            BucketingStrategy::Daily => start.checked_add_days(Days::new(u64::from(offset))),
            BucketingStrategy::Weekly => {
                start.checked_add_days(Days::new(u64::from(offset) * 7))
            }
            BucketingStrategy::Monthly => start.checked_add_months(Months::new(offset)),
        }
    }
}

/// 計劃時段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// 時段ID
    pub id: PeriodId,

    /// 時段名稱
    pub name: String,

    /// 起始日（未綁定日曆時為 None）
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Period {
    pub fn new(id: PeriodId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            start_date: None,
        }
    }

    /// 是否為期初基準時段
    pub fn is_baseline(&self) -> bool {
        self.id == 0
    }
}

/// 計劃時界：連續時段 0..=N，時段 0 為期初庫存基準
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    periods: Vec<Period>,
}

impl PlanningHorizon {
    /// 創建 0..=last_period 的時段序列
    pub fn new(last_period: PeriodId) -> Self {
        let periods = (0..=last_period)
            .map(|id| Period::new(id, format!("Period {id}")))
            .collect();
        Self { periods }
    }

    /// 從外部時段清單建立（必須從 0 起連續）
    pub fn from_periods(mut periods: Vec<Period>) -> Result<Self> {
        if periods.is_empty() {
            return Err(MrpError::InvalidHorizon("時段清單為空".to_string()));
        }

        periods.sort_by_key(|p| p.id);
        for (index, period) in periods.iter().enumerate() {
            if period.id as usize != index {
                return Err(MrpError::InvalidHorizon(format!(
                    "時段ID不連續: 預期 {}, 實際 {}",
                    index, period.id
                )));
            }
        }

        Ok(Self { periods })
    }

    /// 建構器模式：綁定日曆，為每個時段標記起始日與名稱
    pub fn with_calendar(mut self, start: NaiveDate, strategy: BucketingStrategy) -> Self {
        for period in &mut self.periods {
            period.start_date = strategy.bucket_start(start, period.id);
            period.name = format!("{} {}", strategy.label(), period.id);
        }
        self
    }

    /// 最後一個時段ID (N)
    pub fn last_period(&self) -> PeriodId {
        self.periods.len().saturating_sub(1) as PeriodId
    }

    /// 時段總數 (N+1)
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn contains(&self, period_id: PeriodId) -> bool {
        (period_id as usize) < self.periods.len()
    }

    pub fn get(&self, period_id: PeriodId) -> Option<&Period> {
        self.periods.get(period_id as usize)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// 計劃時段 1..=N（不含基準時段）
    pub fn planning_periods(&self) -> impl Iterator<Item = PeriodId> {
        1..=self.last_period()
    }
}
