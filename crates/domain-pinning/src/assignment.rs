use std::collections::BTreeMap;

use cpu_spec::{CpuId, CpuSet};

use crate::placement::DomainPlacement;
use crate::{extract, GuestCellId, Map, VcpuId};

/// One instance's pinning state, extracted from a single placement
/// descriptor snapshot.
///
/// A plain value with no identity of its own: re-fetching the descriptor
/// after a lifecycle event produces a fresh assignment, and assignments are
/// compared structurally. Whether a comparison of two assignments is
/// meaningful (e.g. before/after a migration) is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinningAssignment {
    /// vCPU -> host CPU; populated only under the dedicated CPU policy.
    pub vcpu_pins: Map<VcpuId, CpuId>,
    /// Guest NUMA cell -> host cells its memory is bound to.
    pub cell_pins: BTreeMap<GuestCellId, CpuSet>,
    /// Host CPUs the emulator threads may run on; empty when unset.
    pub emulator_pins: CpuSet,
    /// The floating vCPU cpuset; meaningful only without dedicated pinning.
    pub shared_cpuset: CpuSet,
}

impl PinningAssignment {
    pub fn from_placement(placement: &DomainPlacement) -> Self {
        Self {
            vcpu_pins: extract::vcpu_pins(placement),
            cell_pins: extract::cell_pins(placement),
            emulator_pins: extract::emulator_pins(placement),
            shared_cpuset: extract::shared_cpuset(placement),
        }
    }

    /// The set of host CPUs used by the vCPU pins.
    pub fn pinned_pcpus(&self) -> CpuSet {
        self.vcpu_pins.values().copied().collect()
    }

    pub fn is_pinned(&self) -> bool {
        !self.vcpu_pins.is_empty()
    }
}
