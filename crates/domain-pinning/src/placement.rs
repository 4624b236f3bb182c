use serde::{Deserialize, Serialize};

use cpu_spec::CpuId;

use crate::{GuestCellId, VcpuId};

/// Placement descriptor: a snapshot of one instance's live resource
/// assignment, as fetched by a per-instance state provider.
///
/// The shape mirrors the subtree of the hypervisor domain document that
/// carries placement state: `<cputune>/<vcpupin>`, `<cputune>/<emulatorpin>`,
/// `<numatune>/<memnode>` and the cpuset attribute of the top-level `<vcpu>`
/// element. Every attribute is optional so that a snapshot with a mangled
/// sub-element still deserializes; the extraction functions decide what to do
/// with incomplete entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainPlacement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpu: Option<VcpuElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cputune: Option<Cputune>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numatune: Option<Numatune>,
}

/// The top-level vCPU scheduling element. Its cpuset attribute is the
/// floating domain of non-pinned vCPUs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcpuElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cputune {
    #[serde(default)]
    pub vcpupin: Vec<VcpupinEntry>,
    #[serde(default)]
    pub emulatorpin: Vec<EmulatorpinEntry>,
}

/// One vCPU-to-pCPU pin. Under the dedicated CPU policy the cpuset is a
/// single host CPU id, not a range spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VcpupinEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpu: Option<VcpuId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuset: Option<CpuId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmulatorpinEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Numatune {
    #[serde(default)]
    pub memnode: Vec<MemnodeEntry>,
}

/// Memory-node binding of one guest NUMA cell: the host cells its memory is
/// allowed on, as a range spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemnodeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellid: Option<GuestCellId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodeset: Option<String>,
}
