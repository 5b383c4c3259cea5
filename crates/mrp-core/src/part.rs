//! 物料主檔

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{MrpError, PartId, Quantity, Result};

/// 採購類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcurementType {
    /// 採購
    Buy,
    /// 生產
    #[default]
    Make,
}

/// 物料（計劃執行期間不可變）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// 物料ID
    pub id: PartId,

    /// 物料名稱
    pub name: String,

    /// 提前期（時段數）
    pub lead_time: u32,

    /// 批量（訂單數量必須是此倍數）
    pub lot_size: Quantity,

    /// 期初庫存（只作用於時段 0）
    pub initial_inventory: Quantity,

    /// 採購/生產標記
    #[serde(default)]
    pub procurement_type: ProcurementType,
}

impl Part {
    /// 創建新的物料
    pub fn new(id: PartId, name: impl Into<String>, lead_time: u32, lot_size: Quantity) -> Self {
        Self {
            id,
            name: name.into(),
            lead_time,
            lot_size,
            initial_inventory: 0,
            procurement_type: ProcurementType::Make,
        }
    }

    /// 建構器模式：設置期初庫存
    pub fn with_initial_inventory(mut self, quantity: Quantity) -> Self {
        self.initial_inventory = quantity;
        self
    }

    /// 建構器模式：設置採購類型
    pub fn with_procurement_type(mut self, procurement_type: ProcurementType) -> Self {
        self.procurement_type = procurement_type;
        self
    }

    /// 檢查物料參數
    pub fn validate(&self) -> Result<()> {
        if self.lot_size <= 0 {
            return Err(MrpError::InvalidLotSize {
                part_id: self.id,
                lot_size: self.lot_size,
            });
        }
        if self.initial_inventory < 0 {
            return Err(MrpError::NegativeQuantity {
                part_id: self.id,
                field: "initial_inventory",
                value: self.initial_inventory,
            });
        }
        Ok(())
    }
}

/// 物料目錄（依物料ID排序）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartCatalog {
    parts: BTreeMap<PartId, Part>,
}

impl PartCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 從物料清單建立目錄
    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Result<Self> {
        let mut catalog = Self::new();
        for part in parts {
            catalog.insert(part)?;
        }
        Ok(catalog)
    }

    /// 加入物料，ID 重複時報錯
    pub fn insert(&mut self, part: Part) -> Result<()> {
        if self.parts.contains_key(&part.id) {
            return Err(MrpError::DuplicatePart(part.id));
        }
        self.parts.insert(part.id, part);
        Ok(())
    }

    pub fn get(&self, id: PartId) -> Result<&Part> {
        self.parts.get(&id).ok_or(MrpError::UnknownPart(id))
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PartId> + '_ {
        self.parts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 檢查所有物料參數
    pub fn validate(&self) -> Result<()> {
        self.parts.values().try_for_each(Part::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_part() {
        let part = Part::new(1, "A", 2, 30).with_initial_inventory(20);

        assert_eq!(part.id, 1);
        assert_eq!(part.name, "A");
        assert_eq!(part.lead_time, 2);
        assert_eq!(part.lot_size, 30);
        assert_eq!(part.initial_inventory, 20);
        assert_eq!(part.procurement_type, ProcurementType::Make);
        assert!(part.validate().is_ok());
    }

    #[test]
    fn test_invalid_lot_size() {
        let part = Part::new(7, "BAD", 1, 0);
        assert!(matches!(
            part.validate(),
            Err(MrpError::InvalidLotSize { part_id: 7, lot_size: 0 })
        ));
    }

    #[test]
    fn test_negative_initial_inventory() {
        let part = Part::new(8, "NEG", 1, 10).with_initial_inventory(-5);
        assert!(matches!(
            part.validate(),
            Err(MrpError::NegativeQuantity { part_id: 8, .. })
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = PartCatalog::from_parts(vec![
            Part::new(1, "A", 2, 30),
            Part::new(1, "A-COPY", 1, 10),
        ]);
        assert!(matches!(result, Err(MrpError::DuplicatePart(1))));
    }

    #[test]
    fn test_catalog_ordering() {
        let catalog = PartCatalog::from_parts(vec![
            Part::new(3, "C", 2, 60),
            Part::new(1, "A", 2, 30),
            Part::new(2, "B", 2, 50),
        ])
        .unwrap();

        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(matches!(catalog.get(9), Err(MrpError::UnknownPart(9))));
    }
}
