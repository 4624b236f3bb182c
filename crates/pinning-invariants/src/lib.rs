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

//! Set-theoretic predicates over pinning assignments and host topologies.
//!
//! Each predicate returns a [`Verdict`]: a violation is an expected outcome
//! carrying the offending values for diagnostics, never an `Err`. The
//! predicates are pure and stateless; whether the compared snapshots are
//! correctly time-ordered around a lifecycle event is the caller's concern.

mod predicates;
mod verdict;

pub use predicates::cells_per_host_equal;
pub use predicates::disjoint;
pub use predicates::pin_count_equals;
pub use predicates::sets_equal;
pub use predicates::siblings_isolated;
pub use predicates::siblings_used;
pub use predicates::subset_of;
pub use predicates::sufficient_free_hugepages;
pub use verdict::Verdict;
pub use verdict::Violation;
