/*
 * Copyright 2024 Fluence DAO
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use fxhash::FxHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

pub type Map<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

mod assignment;
pub mod db_topology;
pub mod extract;
mod placement;

/// Index of a guest vCPU.
pub type VcpuId = usize;

/// Id of a guest NUMA cell, preserved exactly as the instance reports it.
pub type GuestCellId = usize;

pub use assignment::PinningAssignment;
pub use placement::Cputune;
pub use placement::DomainPlacement;
pub use placement::EmulatorpinEntry;
pub use placement::MemnodeEntry;
pub use placement::Numatune;
pub use placement::VcpuElement;
pub use placement::VcpupinEntry;
