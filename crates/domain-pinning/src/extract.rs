//! Best-effort extraction of pinning state out of a placement descriptor.
//!
//! The descriptor is a snapshot of external state, so a malformed or
//! incomplete sub-element excludes that entry instead of failing the whole
//! extraction; each exclusion leaves a warning in the log. None of these
//! functions consult host topology.

use std::collections::BTreeMap;

use cpu_spec::{CpuId, CpuSet};

use crate::placement::DomainPlacement;
use crate::{GuestCellId, Map, VcpuId};

/// vCPU index to host CPU id, one entry per vcpupin element.
///
/// An empty map is the signal that the instance runs under a floating/shared
/// policy, not an error.
pub fn vcpu_pins(placement: &DomainPlacement) -> Map<VcpuId, CpuId> {
    let Some(cputune) = &placement.cputune else {
        return Map::default();
    };

    cputune
        .vcpupin
        .iter()
        .filter_map(|entry| match (entry.vcpu, entry.cpuset) {
            (Some(vcpu), Some(cpuset)) => Some((vcpu, cpuset)),
            _ => {
                tracing::warn!(
                    target: "domain-pinning",
                    "Skipping incomplete vcpupin entry {entry:?}"
                );
                None
            }
        })
        .collect()
}

/// Guest NUMA cell to the set of host cells its memory is bound to.
///
/// Guest cell ids are preserved exactly as reported; they need not be dense
/// or start at 0.
pub fn cell_pins(placement: &DomainPlacement) -> BTreeMap<GuestCellId, CpuSet> {
    let Some(numatune) = &placement.numatune else {
        return BTreeMap::new();
    };

    numatune
        .memnode
        .iter()
        .filter_map(|entry| {
            let (Some(cellid), Some(nodeset)) = (entry.cellid, entry.nodeset.as_deref()) else {
                tracing::warn!(
                    target: "domain-pinning",
                    "Skipping incomplete memnode entry {entry:?}"
                );
                return None;
            };
            match nodeset.parse::<CpuSet>() {
                Ok(nodes) => Some((cellid, nodes)),
                Err(err) => {
                    tracing::warn!(
                        target: "domain-pinning",
                        "Skipping memnode entry of cell {cellid} with bad nodeset: {err}"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Union of the cpusets the instance's emulator threads may run on. In
/// practice there is zero or one emulatorpin element, but nothing forbids
/// several.
pub fn emulator_pins(placement: &DomainPlacement) -> CpuSet {
    let Some(cputune) = &placement.cputune else {
        return CpuSet::new();
    };

    cputune
        .emulatorpin
        .iter()
        .filter_map(|entry| {
            let Some(cpuset) = entry.cpuset.as_deref() else {
                tracing::warn!(
                    target: "domain-pinning",
                    "Skipping emulatorpin entry without cpuset"
                );
                return None;
            };
            match cpuset.parse::<CpuSet>() {
                Ok(cpus) => Some(cpus),
                Err(err) => {
                    tracing::warn!(
                        target: "domain-pinning",
                        "Skipping emulatorpin entry with bad cpuset: {err}"
                    );
                    None
                }
            }
        })
        .fold(CpuSet::new(), |acc, cpus| acc.union(&cpus))
}

/// The floating vCPU cpuset of the top-level scheduling element; empty when
/// absent. Meaningful only for instances without dedicated pinning.
pub fn shared_cpuset(placement: &DomainPlacement) -> CpuSet {
    let Some(cpuset) = placement
        .vcpu
        .as_ref()
        .and_then(|vcpu| vcpu.cpuset.as_deref())
    else {
        return CpuSet::new();
    };

    match cpuset.parse::<CpuSet>() {
        Ok(cpus) => cpus,
        Err(err) => {
            tracing::warn!(
                target: "domain-pinning",
                "Ignoring vcpu element with bad cpuset: {err}"
            );
            CpuSet::new()
        }
    }
}
