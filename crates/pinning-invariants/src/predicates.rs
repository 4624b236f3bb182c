use std::collections::BTreeMap;
use std::fmt::Debug;

use itertools::Itertools;

use cpu_spec::{CpuId, CpuSet};
use domain_pinning::{Map, VcpuId};
use host_topology::{CellId, HostTopology, HugepagePool};

use crate::verdict::{Verdict, Violation};

/// Holds when the assignment has exactly `expected` vCPU pins.
///
/// `expected == 0` is the check that an instance really runs unpinned, e.g.
/// after a resize to a shared-policy flavor.
pub fn pin_count_equals(pins: &Map<VcpuId, CpuId>, expected: usize) -> Verdict {
    let found = pins.len();
    if found == expected {
        Verdict::Pass
    } else {
        Violation::PinCountMismatch { expected, found }.into()
    }
}

/// Holds when both sets are non-empty and share no CPU.
///
/// Empty operands are rejected rather than vacuously passing: two unpinned
/// instances have "disjoint" pins only in the useless sense, and letting that
/// pass would mask a lost pinning.
pub fn disjoint(left: &CpuSet, right: &CpuSet) -> Verdict {
    if left.is_empty() || right.is_empty() {
        return Violation::EmptyCpuset {
            left: left.clone(),
            right: right.clone(),
        }
        .into();
    }

    let common = left.intersection(right);
    if common.is_empty() {
        Verdict::Pass
    } else {
        Violation::Overlap {
            left: left.clone(),
            right: right.clone(),
            common,
        }
        .into()
    }
}

/// Holds when every CPU of `set` is in `superset`. The empty set is a subset
/// of anything.
pub fn subset_of(set: &CpuSet, superset: &CpuSet) -> Verdict {
    if set.is_subset(superset) {
        Verdict::Pass
    } else {
        Violation::NotASubset {
            set: set.clone(),
            superset: superset.clone(),
            excess: set.difference(superset),
        }
        .into()
    }
}

/// Structural equality of two values of the same kind (cpusets, pin maps,
/// whole assignments).
pub fn sets_equal<T: PartialEq + Debug>(left: &T, right: &T) -> Verdict {
    if left == right {
        Verdict::Pass
    } else {
        Violation::NotEqual {
            left: format!("{left:?}"),
            right: format!("{right:?}"),
        }
        .into()
    }
}

/// The isolate thread policy: no two vCPUs of the instance may land on
/// sibling threads of the same physical core.
///
/// `siblings` is the self-inclusive map of [`HostTopology::siblings`]; the
/// pinned CPU itself is excluded here before the overlap check. Passes
/// vacuously on an unpinned instance; assert the pin count separately.
pub fn siblings_isolated(pins: &Map<VcpuId, CpuId>, siblings: &Map<CpuId, CpuSet>) -> Verdict {
    let used: CpuSet = pins.values().copied().collect();
    for pcpu in used.iter() {
        let others = match sibling_threads(pcpu, siblings) {
            Ok(others) => others,
            Err(violation) => return violation.into(),
        };
        let siblings_in_use = others.intersection(&used);
        if !siblings_in_use.is_empty() {
            return Violation::SiblingInUse {
                pcpu,
                siblings_in_use,
            }
            .into();
        }
    }
    Verdict::Pass
}

/// The require/prefer thread policies: every pinned CPU must have at least
/// one sibling thread that is also pinned by this instance.
pub fn siblings_used(pins: &Map<VcpuId, CpuId>, siblings: &Map<CpuId, CpuSet>) -> Verdict {
    let used: CpuSet = pins.values().copied().collect();
    for pcpu in used.iter() {
        let others = match sibling_threads(pcpu, siblings) {
            Ok(others) => others,
            Err(violation) => return violation.into(),
        };
        if others.intersection(&used).is_empty() {
            return Violation::SiblingsUnused {
                pcpu,
                siblings: others,
            }
            .into();
        }
    }
    Verdict::Pass
}

// Self-exclusive sibling set of a pinned CPU. A pin outside the sibling map
// is a cross-entity inconsistency and surfaces as a violation.
fn sibling_threads(pcpu: CpuId, siblings: &Map<CpuId, CpuSet>) -> Result<CpuSet, Violation> {
    match siblings.get(&pcpu) {
        Some(set) => Ok(set.without(pcpu)),
        None => Err(Violation::UnknownCpu { cpu: pcpu }),
    }
}

/// Holds when every NUMA cell of every given topology has the same CPU
/// count. Hosts with uneven cells cannot host the "fill one cell" scenarios,
/// so the suite gates on this before comparing placements across hosts.
pub fn cells_per_host_equal<'a>(topologies: impl IntoIterator<Item = &'a HostTopology>) -> Verdict {
    let sizes: Vec<usize> = topologies
        .into_iter()
        .flat_map(|topology| topology.cells().values())
        .map(CpuSet::len)
        .sorted()
        .dedup()
        .collect();

    if sizes.len() == 1 {
        Verdict::Pass
    } else {
        Violation::UnevenCellSizes { sizes }.into()
    }
}

/// Holds when every cell's free hugepage count reaches `min_free_required`.
///
/// The caller picks the threshold; the suite passes `total / 2` to ensure no
/// cell can take a second instance of that size. That gate does not
/// guarantee a tighter fit, and this predicate deliberately does not infer
/// one. An empty map means the host reports no hugepage configuration at
/// all, which is its own violation, distinct from "zero pages free".
pub fn sufficient_free_hugepages(
    hugepages: &BTreeMap<CellId, HugepagePool>,
    min_free_required: u64,
) -> Verdict {
    let Some(min_free) = hugepages.values().map(|pool| pool.free).min() else {
        return Violation::HugepagesUnconfigured.into();
    };

    if min_free >= min_free_required {
        Verdict::Pass
    } else {
        Violation::NotEnoughFreeHugepages {
            required: min_free_required,
            min_free,
        }
        .into()
    }
}
