//! MRP 計劃運行配置

use serde::{Deserialize, Serialize};

use crate::Result;

/// 計劃運行參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 最大計算次數（每個 BOM 層級一次）
    /// - None: 依 BOM 層級數自動決定（層級數 + 1）
    /// - Some(n): 超過 n 次仍未完成所有層級時回報收斂失敗
    pub max_passes: Option<usize>,

    /// 是否並行計算同層級物料
    pub parallel: bool,

    /// 是否記錄需求追溯（子件毛需求來自哪些父件）
    pub collect_pegging: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_passes: None,
            parallel: true,
            collect_pegging: true,
        }
    }
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置最大計算次數
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// 建構器模式：設置是否並行計算
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置是否記錄需求追溯
    pub fn with_pegging(mut self, collect: bool) -> Self {
        self.collect_pegging = collect;
        self
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    ///
    /// ```
    /// # use mrp_core::PlanningConfig;
    /// let config = PlanningConfig::from_json_str(r#"{ "parallel": false }"#).unwrap();
    /// assert!(!config.parallel);
    /// assert!(config.collect_pegging);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 輸出為 JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 本次運行的計算次數上限
    pub fn pass_limit(&self, level_count: usize) -> usize {
        self.max_passes.unwrap_or(level_count + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MrpError;

    #[test]
    fn test_default_config() {
        let config = PlanningConfig::default();

        assert_eq!(config.max_passes, None);
        assert!(config.parallel);
        assert!(config.collect_pegging);
        assert_eq!(config.pass_limit(3), 4);
    }

    #[test]
    fn test_config_builder() {
        let config = PlanningConfig::new()
            .with_max_passes(2)
            .with_parallel(false)
            .with_pegging(false);

        assert_eq!(config.pass_limit(10), 2);
        assert!(!config.parallel);
        assert!(!config.collect_pegging);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PlanningConfig::new().with_max_passes(5);
        let json = config.to_json_string().unwrap();

        assert_eq!(PlanningConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let result = PlanningConfig::from_json_str("{ parallel: ");
        assert!(matches!(result, Err(MrpError::Config(_))));
    }
}
