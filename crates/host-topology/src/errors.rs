use thiserror::Error;

use cpu_spec::{CpuId, ParseError};

use crate::CellId;

#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("CPU {cpu} reported by both cell {first_cell} and cell {second_cell}")]
    CpuInTwoCells {
        cpu: CpuId,
        first_cell: CellId,
        second_cell: CellId,
    },
    #[error("Cell {cell} has no CPUs")]
    EmptyCell { cell: CellId },
    #[error("Failed to parse sibling spec of CPU {cpu}: {err}")]
    MalformedSiblings {
        cpu: CpuId,
        #[source]
        err: ParseError,
    },
}
