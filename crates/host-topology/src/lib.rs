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

mod capabilities;
pub mod errors;
mod topology;

/// Id of a host NUMA cell. Dense, 0-based, assigned in discovery order.
pub type CellId = usize;

pub use capabilities::CellCapabilities;
pub use capabilities::CpuCapabilities;
pub use capabilities::HostCapabilities;
pub use capabilities::HugepagePool;
pub use topology::HostTopology;
