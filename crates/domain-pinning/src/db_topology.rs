//! Pin extraction from the compute database's NUMA topology records.
//!
//! The database stores an instance's NUMA topology as versioned-object JSON:
//! the payload lives under an `"nova_object.data"` envelope at every level,
//! and each guest cell carries its vCPU pins in a `"cpu_pinning_raw"` object
//! keyed by the stringified vCPU index. Cells carry no id of their own, so
//! they are numbered in document order. Same best-effort contract as the
//! descriptor extractors: malformed entries are skipped with a warning.

use std::collections::BTreeMap;

use cpu_spec::{CpuId, CpuSet};
use serde_json::Value;

use crate::{GuestCellId, Map, VcpuId};

const OBJECT_DATA: &str = "nova_object.data";
const CELLS: &str = "cells";
const CPU_PINNING: &str = "cpu_pinning_raw";

/// Per-guest-cell vCPU pins of one instance's database topology record.
pub fn cpu_pins(topology: &Value) -> BTreeMap<GuestCellId, Map<VcpuId, CpuId>> {
    let Some(cells) = topology
        .get(OBJECT_DATA)
        .and_then(|data| data.get(CELLS))
        .and_then(Value::as_array)
    else {
        tracing::warn!(
            target: "domain-pinning",
            "Database topology record carries no cells"
        );
        return BTreeMap::new();
    };

    cells
        .iter()
        .enumerate()
        .map(|(cell_number, cell)| (cell_number, cell_cpu_pins(cell_number, cell)))
        .collect()
}

/// All host CPUs used across the cells of a database pin mapping.
pub fn pcpus(pins: &BTreeMap<GuestCellId, Map<VcpuId, CpuId>>) -> CpuSet {
    pins.values()
        .flat_map(|cell_pins| cell_pins.values().copied())
        .collect()
}

fn cell_cpu_pins(cell_number: usize, cell: &Value) -> Map<VcpuId, CpuId> {
    let Some(pinning) = cell
        .get(OBJECT_DATA)
        .and_then(|data| data.get(CPU_PINNING))
        .and_then(Value::as_object)
    else {
        return Map::default();
    };

    pinning
        .iter()
        .filter_map(|(vcpu, pcpu)| {
            let parsed = vcpu
                .parse::<VcpuId>()
                .ok()
                .zip(pcpu.as_u64().map(|pcpu| pcpu as CpuId));
            if parsed.is_none() {
                tracing::warn!(
                    target: "domain-pinning",
                    "Skipping unparsable pin {vcpu} -> {pcpu} of cell {cell_number}"
                );
            }
            parsed
        })
        .collect()
}
