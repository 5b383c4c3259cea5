//! BOM 圖（父件 → 子件關係與展開層級）

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{MrpError, PartCatalog, PartId, Quantity, Result};

/// BOM 關係
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomEdge {
    /// 父件ID
    pub parent_id: PartId,

    /// 子件ID
    pub component_id: PartId,

    /// 用量（每單位父件下達消耗的子件數量）
    pub multiplier: Quantity,

    /// 子件在展開順序中的層級（0 為最終產品）
    pub level: u32,
}

impl BomEdge {
    pub fn new(parent_id: PartId, component_id: PartId, multiplier: Quantity, level: u32) -> Self {
        Self {
            parent_id,
            component_id,
            multiplier,
            level,
        }
    }
}

/// BOM 圖
///
/// 以邊的索引維護父件/子件的雙向查詢。層級取自邊上的 `level`：
/// 從不作為子件出現的物料是層級 0。
#[derive(Debug, Clone, Default)]
pub struct BomGraph {
    edges: Vec<BomEdge>,
    by_parent: BTreeMap<PartId, Vec<usize>>,
    by_component: BTreeMap<PartId, Vec<usize>>,
}

impl BomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 BOM 關係清單建立
    pub fn from_edges(edges: impl IntoIterator<Item = BomEdge>) -> Result<Self> {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// 加入 BOM 關係，(父件, 子件) 必須唯一且用量為正
    pub fn add_edge(&mut self, edge: BomEdge) -> Result<()> {
        if edge.multiplier <= 0 {
            return Err(MrpError::InvalidMultiplier {
                parent_id: edge.parent_id,
                component_id: edge.component_id,
                multiplier: edge.multiplier,
            });
        }
        if self.edge(edge.parent_id, edge.component_id).is_some() {
            return Err(MrpError::DuplicateBomEdge {
                parent_id: edge.parent_id,
                component_id: edge.component_id,
            });
        }

        let index = self.edges.len();
        self.by_parent.entry(edge.parent_id).or_default().push(index);
        self.by_component
            .entry(edge.component_id)
            .or_default()
            .push(index);
        self.edges.push(edge);
        Ok(())
    }

    /// 查詢單一 BOM 關係
    pub fn edge(&self, parent_id: PartId, component_id: PartId) -> Option<&BomEdge> {
        self.children_of(parent_id)
            .find(|edge| edge.component_id == component_id)
    }

    pub fn edges(&self) -> &[BomEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 父件的所有子件關係
    pub fn children_of(&self, parent_id: PartId) -> impl Iterator<Item = &BomEdge> {
        self.by_parent
            .get(&parent_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// 子件的所有父件關係
    pub fn parents_of(&self, component_id: PartId) -> impl Iterator<Item = &BomEdge> {
        self.by_component
            .get(&component_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// 是否作為子件出現（有父件）
    pub fn is_component(&self, part_id: PartId) -> bool {
        self.by_component.contains_key(&part_id)
    }

    /// 物料的展開層級
    ///
    /// 多個父件標示不同層級時取最大值，拓撲順序由 [`BomGraph::validate`] 檢查。
    pub fn level_of(&self, part_id: PartId) -> u32 {
        self.parents_of(part_id)
            .map(|edge| edge.level)
            .max()
            .unwrap_or(0)
    }

    /// 檢查 BOM 引用與層級順序
    pub fn validate(&self, catalog: &PartCatalog) -> Result<()> {
        for edge in &self.edges {
            if !catalog.contains(edge.parent_id) || !catalog.contains(edge.component_id) {
                return Err(MrpError::InvalidBomReference {
                    parent_id: edge.parent_id,
                    component_id: edge.component_id,
                });
            }
        }

        for edge in &self.edges {
            let parent_level = self.level_of(edge.parent_id);
            let component_level = self.level_of(edge.component_id);
            if component_level <= parent_level {
                return Err(MrpError::CyclicBom {
                    parent_id: edge.parent_id,
                    component_id: edge.component_id,
                    parent_level,
                    component_level,
                });
            }
        }

        Ok(())
    }

    /// 依層級分組目錄中的物料（層級遞增，組內依ID排序）
    pub fn level_groups(&self, catalog: &PartCatalog) -> BTreeMap<u32, Vec<PartId>> {
        let mut groups: BTreeMap<u32, Vec<PartId>> = BTreeMap::new();
        for part_id in catalog.ids() {
            groups.entry(self.level_of(part_id)).or_default().push(part_id);
        }
        groups
    }

    /// 指定物料的所有下階物料（不含自身）
    pub fn descendants(&self, roots: impl IntoIterator<Item = PartId>) -> BTreeSet<PartId> {
        let mut visited = HashSet::new();
        let mut stack: Vec<PartId> = roots.into_iter().collect();
        let mut result = BTreeSet::new();

        while let Some(part_id) = stack.pop() {
            if !visited.insert(part_id) {
                continue;
            }
            for edge in self.children_of(part_id) {
                result.insert(edge.component_id);
                stack.push(edge.component_id);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Part;
    use rstest::rstest;

    fn catalog() -> PartCatalog {
        PartCatalog::from_parts(vec![
            Part::new(1, "A", 2, 30),
            Part::new(2, "B", 2, 50),
            Part::new(3, "C", 2, 60),
        ])
        .unwrap()
    }

    fn three_level_bom() -> BomGraph {
        BomGraph::from_edges(vec![
            BomEdge::new(1, 2, 1, 1),
            BomEdge::new(1, 3, 2, 2),
            BomEdge::new(2, 3, 1, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_parent_and_child_lookup() {
        let bom = three_level_bom();

        assert_eq!(bom.edge_count(), 3);
        assert_eq!(bom.children_of(1).count(), 2);
        assert_eq!(bom.parents_of(3).count(), 2);
        assert_eq!(bom.parents_of(1).count(), 0);
        assert!(bom.is_component(2));
        assert!(!bom.is_component(1));
        assert_eq!(bom.edge(1, 3).map(|e| e.multiplier), Some(2));
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 2)]
    fn test_level_of(#[case] part_id: PartId, #[case] expected: u32) {
        assert_eq!(three_level_bom().level_of(part_id), expected);
    }

    #[test]
    fn test_level_groups() {
        let groups = three_level_bom().level_groups(&catalog());

        assert_eq!(groups.get(&0), Some(&vec![1]));
        assert_eq!(groups.get(&1), Some(&vec![2]));
        assert_eq!(groups.get(&2), Some(&vec![3]));
    }

    #[test]
    fn test_validate_ok() {
        assert!(three_level_bom().validate(&catalog()).is_ok());
    }

    #[test]
    fn test_validate_unknown_reference() {
        let bom = BomGraph::from_edges(vec![BomEdge::new(1, 99, 1, 1)]).unwrap();
        assert!(matches!(
            bom.validate(&catalog()),
            Err(MrpError::InvalidBomReference { parent_id: 1, component_id: 99 })
        ));
    }

    #[test]
    fn test_validate_level_not_increasing() {
        // 子件層級 1 與父件 2 的層級相同
        let bom = BomGraph::from_edges(vec![BomEdge::new(1, 2, 1, 1), BomEdge::new(2, 3, 1, 1)])
            .unwrap();
        assert!(matches!(
            bom.validate(&catalog()),
            Err(MrpError::CyclicBom { parent_id: 2, component_id: 3, .. })
        ));
    }

    #[test]
    fn test_validate_cycle() {
        let bom = BomGraph::from_edges(vec![
            BomEdge::new(1, 2, 1, 1),
            BomEdge::new(2, 3, 1, 2),
            BomEdge::new(3, 2, 1, 1),
        ])
        .unwrap();
        assert!(matches!(bom.validate(&catalog()), Err(MrpError::CyclicBom { .. })));
    }

    #[test]
    fn test_self_loop_is_cyclic() {
        let bom = BomGraph::from_edges(vec![BomEdge::new(2, 2, 1, 1)]).unwrap();
        assert!(matches!(bom.validate(&catalog()), Err(MrpError::CyclicBom { .. })));
    }

    #[test]
    fn test_rejects_duplicate_and_invalid_multiplier() {
        let mut bom = three_level_bom();
        assert!(matches!(
            bom.add_edge(BomEdge::new(1, 2, 3, 1)),
            Err(MrpError::DuplicateBomEdge { parent_id: 1, component_id: 2 })
        ));
        assert!(matches!(
            bom.add_edge(BomEdge::new(2, 1, 0, 1)),
            Err(MrpError::InvalidMultiplier { multiplier: 0, .. })
        ));
    }

    #[test]
    fn test_descendants() {
        let bom = three_level_bom();

        assert_eq!(bom.descendants([1]), BTreeSet::from([2, 3]));
        assert_eq!(bom.descendants([2]), BTreeSet::from([3]));
        assert!(bom.descendants([3]).is_empty());
    }
}
