use std::collections::BTreeMap;

use cpu_spec::{CpuId, CpuSet};

use crate::capabilities::{HostCapabilities, HugepagePool};
use crate::errors::TopologyError;
use crate::{CellId, Map};

/// In-memory model of one host's physical CPU topology: NUMA cells, sibling
/// threads and hugepage pools. Built once from a capability descriptor and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HostTopology {
    // cell id -> CPUs belonging to it; cells partition the discovered CPUs
    cells: BTreeMap<CellId, CpuSet>,
    // CPU id -> threads sharing its physical core, self-inclusive
    siblings: Map<CpuId, CpuSet>,
    // cell id -> hugepage pool; empty when the host reports none
    hugepages: BTreeMap<CellId, HugepagePool>,
}

impl HostTopology {
    /// Builds the topology model from a capability descriptor.
    ///
    /// Cells are numbered 0..n in the order the descriptor lists them; the
    /// model never infers a cell id from the descriptor except by position.
    pub fn build(capabilities: &HostCapabilities) -> Result<Self, TopologyError> {
        let mut cells: BTreeMap<CellId, CpuSet> = BTreeMap::new();
        let mut siblings: Map<CpuId, CpuSet> = Map::default();
        let mut hugepages: BTreeMap<CellId, HugepagePool> = BTreeMap::new();
        let mut owning_cell: Map<CpuId, CellId> = Map::default();

        for (cell_id, cell) in capabilities.cells.iter().enumerate() {
            if cell.cpus.is_empty() {
                return Err(TopologyError::EmptyCell { cell: cell_id });
            }

            let mut cell_cpus = CpuSet::new();
            for cpu in &cell.cpus {
                match owning_cell.get(&cpu.id) {
                    Some(first_cell) if *first_cell != cell_id => {
                        return Err(TopologyError::CpuInTwoCells {
                            cpu: cpu.id,
                            first_cell: *first_cell,
                            second_cell: cell_id,
                        });
                    }
                    _ => {}
                }
                owning_cell.insert(cpu.id, cell_id);
                cell_cpus.insert(cpu.id);

                let sibling_set = cpu.siblings.parse::<CpuSet>().map_err(|err| {
                    TopologyError::MalformedSiblings { cpu: cpu.id, err }
                })?;
                siblings.insert(cpu.id, sibling_set);
            }

            if let Some(pool) = cell.hugepages {
                hugepages.insert(cell_id, pool);
            }
            cells.insert(cell_id, cell_cpus);
        }

        tracing::debug!(
            target: "host-topology",
            "Built topology model: {} cells, {} CPUs",
            cells.len(),
            owning_cell.len()
        );

        Ok(Self {
            cells,
            siblings,
            hugepages,
        })
    }

    /// Records the hugepage pool of one cell, for hosts whose hugepage stats
    /// arrive from a separate probe rather than inside the capability
    /// descriptor. One pool per cell; a later call for the same cell replaces
    /// the earlier one.
    pub fn with_hugepages(mut self, cell: CellId, pool: HugepagePool) -> Self {
        self.hugepages.insert(cell, pool);
        self
    }

    pub fn cells(&self) -> &BTreeMap<CellId, CpuSet> {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&CpuSet> {
        self.cells.get(&id)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Union of all cells' CPUs.
    pub fn all_cpus(&self) -> CpuSet {
        self.cells
            .values()
            .fold(CpuSet::new(), |acc, cpus| acc.union(cpus))
    }

    /// Sibling sets as reported by the host: each set includes the keyed CPU
    /// itself. Callers that want "other threads on this core" must remove the
    /// queried id, e.g. with [`CpuSet::without`].
    pub fn siblings(&self) -> &Map<CpuId, CpuSet> {
        &self.siblings
    }

    /// Self-inclusive sibling set of one CPU; see [`HostTopology::siblings`].
    pub fn siblings_of(&self, cpu: CpuId) -> Option<&CpuSet> {
        self.siblings.get(&cpu)
    }

    /// Per-cell hugepage pools. An empty map means the host reported no
    /// hugepage configuration, not that the pools are exhausted.
    pub fn hugepages(&self) -> &BTreeMap<CellId, HugepagePool> {
        &self.hugepages
    }
}

#[cfg(test)]
mod tests {
    use cpu_spec::CpuSet;

    use crate::capabilities::{CellCapabilities, CpuCapabilities, HostCapabilities, HugepagePool};
    use crate::errors::TopologyError;
    use crate::topology::HostTopology;

    fn cpu(id: usize, siblings: &str) -> CpuCapabilities {
        CpuCapabilities {
            id,
            siblings: siblings.to_string(),
        }
    }

    fn two_cell_host() -> HostCapabilities {
        // 2 cells x 2 cores x 2 threads, siblings reported self-inclusive
        HostCapabilities {
            cells: vec![
                CellCapabilities {
                    cpus: vec![
                        cpu(0, "0,4"),
                        cpu(1, "1,5"),
                        cpu(4, "0,4"),
                        cpu(5, "1,5"),
                    ],
                    hugepages: None,
                },
                CellCapabilities {
                    cpus: vec![
                        cpu(2, "2,6"),
                        cpu(3, "3,7"),
                        cpu(6, "2,6"),
                        cpu(7, "3,7"),
                    ],
                    hugepages: None,
                },
            ],
        }
    }

    #[test]
    fn cells_are_numbered_in_discovery_order() {
        let topology = HostTopology::build(&two_cell_host()).unwrap();

        assert_eq!(topology.cell_count(), 2);
        assert_eq!(topology.cell(0), Some(&"0-1,4-5".parse().unwrap()));
        assert_eq!(topology.cell(1), Some(&"2-3,6-7".parse().unwrap()));
        assert_eq!(topology.cell(2), None);
    }

    #[test]
    fn all_cpus_is_the_cell_union() {
        let topology = HostTopology::build(&two_cell_host()).unwrap();
        assert_eq!(topology.all_cpus(), "0-7".parse().unwrap());
    }

    #[test]
    fn siblings_are_self_inclusive() {
        let topology = HostTopology::build(&two_cell_host()).unwrap();

        let siblings = topology.siblings_of(0).unwrap();
        assert!(siblings.contains(0));
        assert!(siblings.contains(4));
        assert_eq!(siblings.without(0), "4".parse().unwrap());
    }

    #[test]
    fn cpu_in_two_cells_is_rejected() {
        let capabilities = HostCapabilities {
            cells: vec![
                CellCapabilities {
                    cpus: vec![cpu(0, "0"), cpu(4, "4")],
                    hugepages: None,
                },
                CellCapabilities {
                    cpus: vec![cpu(4, "4"), cpu(5, "5")],
                    hugepages: None,
                },
            ],
        };

        let result = HostTopology::build(&capabilities);
        assert_eq!(
            result,
            Err(TopologyError::CpuInTwoCells {
                cpu: 4,
                first_cell: 0,
                second_cell: 1
            })
        );
    }

    #[test]
    fn duplicate_cpu_within_one_cell_is_deduplicated() {
        let capabilities = HostCapabilities {
            cells: vec![CellCapabilities {
                cpus: vec![cpu(0, "0"), cpu(0, "0"), cpu(1, "1")],
                hugepages: None,
            }],
        };

        let topology = HostTopology::build(&capabilities).unwrap();
        assert_eq!(topology.cell(0), Some(&"0-1".parse().unwrap()));
    }

    #[test]
    fn empty_cell_is_rejected() {
        let capabilities = HostCapabilities {
            cells: vec![
                CellCapabilities {
                    cpus: vec![cpu(0, "0")],
                    hugepages: None,
                },
                CellCapabilities {
                    cpus: vec![],
                    hugepages: None,
                },
            ],
        };

        let result = HostTopology::build(&capabilities);
        assert_eq!(result, Err(TopologyError::EmptyCell { cell: 1 }));
    }

    #[test]
    fn malformed_sibling_spec_is_rejected() {
        let capabilities = HostCapabilities {
            cells: vec![CellCapabilities {
                cpus: vec![cpu(0, "0,x")],
                hugepages: None,
            }],
        };

        let result = HostTopology::build(&capabilities);
        assert!(matches!(
            result,
            Err(TopologyError::MalformedSiblings { cpu: 0, .. })
        ));
    }

    #[test]
    fn descriptor_hugepages_are_ingested() {
        let mut capabilities = two_cell_host();
        capabilities.cells[0].hugepages = Some(HugepagePool {
            page_size_kib: 2048,
            total: 1024,
            free: 768,
        });

        let topology = HostTopology::build(&capabilities).unwrap();
        assert_eq!(topology.hugepages().len(), 1);
        assert_eq!(topology.hugepages()[&0].free, 768);
    }

    #[test]
    fn with_hugepages_accumulates_per_cell() {
        let pool_0 = HugepagePool {
            page_size_kib: 2048,
            total: 1024,
            free: 1024,
        };
        let pool_1 = HugepagePool {
            page_size_kib: 2048,
            total: 1024,
            free: 512,
        };

        let topology = HostTopology::build(&two_cell_host())
            .unwrap()
            .with_hugepages(0, pool_0)
            .with_hugepages(1, pool_1);

        assert_eq!(topology.hugepages()[&0], pool_0);
        assert_eq!(topology.hugepages()[&1], pool_1);
    }

    #[test]
    fn no_hugepage_reports_means_empty_map() {
        let topology = HostTopology::build(&two_cell_host()).unwrap();
        // empty map reads as "unsupported", not "zero pages"
        assert!(topology.hugepages().is_empty());
    }

    #[test]
    fn capability_descriptor_deserializes_from_json() {
        let raw = r#"{
            "cells": [
                {
                    "cpus": [
                        {"id": 0, "siblings": "0,2"},
                        {"id": 2, "siblings": "0,2"}
                    ],
                    "hugepages": {"page_size_kib": 2048, "total": 512, "free": 256}
                },
                {
                    "cpus": [
                        {"id": 1, "siblings": "1,3"},
                        {"id": 3, "siblings": "1,3"}
                    ]
                }
            ]
        }"#;

        let capabilities: HostCapabilities = serde_json::from_str(raw).unwrap();
        let topology = HostTopology::build(&capabilities).unwrap();

        assert_eq!(topology.cell(0), Some(&"0,2".parse::<CpuSet>().unwrap()));
        assert_eq!(topology.cell(1), Some(&"1,3".parse::<CpuSet>().unwrap()));
        assert_eq!(topology.hugepages()[&0].total, 512);
        assert!(!topology.hugepages().contains_key(&1));
    }
}
