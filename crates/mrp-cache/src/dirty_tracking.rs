//! 髒標記追蹤

use mrp_core::PartId;
use std::collections::BTreeSet;

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_parts: BTreeSet<PartId>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記物料為髒
    pub fn mark_dirty(&mut self, part_id: PartId) {
        self.dirty_parts.insert(part_id);
    }

    /// 檢查物料是否為髒
    pub fn is_dirty(&self, part_id: PartId) -> bool {
        self.dirty_parts.contains(&part_id)
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_parts.is_empty()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_parts.clear();
    }

    /// 獲取所有髒物料
    pub fn dirty_parts(&self) -> &BTreeSet<PartId> {
        &self.dirty_parts
    }

    /// 取出並清除髒物料
    pub fn take(&mut self) -> BTreeSet<PartId> {
        std::mem::take(&mut self.dirty_parts)
    }

    /// 重新標記（計算失敗時還原）
    pub fn restore(&mut self, parts: BTreeSet<PartId>) {
        self.dirty_parts.extend(parts);
    }
}
