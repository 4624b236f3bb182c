use serde::{Deserialize, Serialize};

use cpu_spec::CpuId;

/// Host capability descriptor as emitted by a host-capabilities provider.
///
/// Mirrors the `<host>/<topology>/<cells>` subtree of hypervisor capability
/// reports: a sequence of NUMA cells, each carrying its CPU entries. Cells are
/// identified purely by their position in the sequence; any id the provider
/// prints alongside is not part of this contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostCapabilities {
    pub cells: Vec<CellCapabilities>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCapabilities {
    pub cpus: Vec<CpuCapabilities>,
    /// Per-cell hugepage stats, when the provider reports them inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugepages: Option<HugepagePool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuCapabilities {
    pub id: CpuId,
    /// Raw sibling spec in the compact range notation, self-inclusive as
    /// reported by the host.
    pub siblings: String,
}

/// Hugepage pool stats of one NUMA cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HugepagePool {
    pub page_size_kib: u64,
    pub total: u64,
    pub free: u64,
}
