use thiserror::Error;

use cpu_spec::{CpuId, CpuSet};

/// Outcome of one invariant check.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Violation(Violation),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_violation(&self) -> bool {
        !self.is_pass()
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Verdict::Pass => None,
            Verdict::Violation(violation) => Some(violation),
        }
    }
}

impl From<Violation> for Verdict {
    fn from(violation: Violation) -> Self {
        Verdict::Violation(violation)
    }
}

/// A failed invariant, carrying the values that broke it. Rendered into
/// test-failure messages, so every variant names the offenders.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Violation {
    #[error("Expected {expected} vCPU pins, found {found}")]
    PinCountMismatch { expected: usize, found: usize },
    #[error("Cpusets must be non-empty to be considered disjoint: \"{left}\", \"{right}\"")]
    EmptyCpuset { left: CpuSet, right: CpuSet },
    #[error("Unexpected overlap in CPU pinning: {left}; {right}; common: {common}")]
    Overlap {
        left: CpuSet,
        right: CpuSet,
        common: CpuSet,
    },
    #[error("{set} is not a subset of {superset}: {excess} outside")]
    NotASubset {
        set: CpuSet,
        superset: CpuSet,
        excess: CpuSet,
    },
    #[error("Values differ: {left} != {right}")]
    NotEqual { left: String, right: String },
    #[error("Pinned CPU {pcpu} shares a core with pinned CPUs {siblings_in_use}")]
    SiblingInUse {
        pcpu: CpuId,
        siblings_in_use: CpuSet,
    },
    #[error("No sibling of pinned CPU {pcpu} ({siblings}) is pinned")]
    SiblingsUnused { pcpu: CpuId, siblings: CpuSet },
    #[error("Pinned CPU {cpu} has no sibling entry in the host topology")]
    UnknownCpu { cpu: CpuId },
    #[error("NUMA cells have differing CPU counts: {sizes:?}")]
    UnevenCellSizes { sizes: Vec<usize> },
    #[error("Host reports no hugepage configuration")]
    HugepagesUnconfigured,
    #[error("Not enough free hugepages: need {required}, the emptiest cell has {min_free}")]
    NotEnoughFreeHugepages { required: u64, min_free: u64 },
}
