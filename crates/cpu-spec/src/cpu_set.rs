use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use range_set_blaze::RangeSetBlaze;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::CpuId;

/// A deduplicated set of CPU ids.
///
/// Parsed from and formatted to the compact range notation used by cpuset
/// attributes ("0-2,5,7-9"). The formatted form coalesces contiguous runs, so
/// `parse(format(s)) == s` always holds while the exact text may differ from
/// what the host tool originally emitted.
#[derive(Clone, PartialEq)]
pub struct CpuSet(RangeSetBlaze<usize>);

impl CpuSet {
    pub fn new() -> Self {
        CpuSet(RangeSetBlaze::new())
    }

    pub fn contains(&self, cpu: CpuId) -> bool {
        self.0.contains(cpu)
    }

    pub fn insert(&mut self, cpu: CpuId) {
        self.0.insert(cpu);
    }

    pub fn len(&self) -> usize {
        self.0.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(&self, other: &CpuSet) -> CpuSet {
        CpuSet(&self.0 | &other.0)
    }

    pub fn intersection(&self, other: &CpuSet) -> CpuSet {
        CpuSet(&self.0 & &other.0)
    }

    pub fn difference(&self, other: &CpuSet) -> CpuSet {
        CpuSet(&self.0 - &other.0)
    }

    /// The set with `cpu` removed. Sibling sets are reported self-inclusive;
    /// this is how callers get the "other threads on this core" view.
    pub fn without(&self, cpu: CpuId) -> CpuSet {
        let mut result = self.0.clone();
        result.remove(cpu);
        CpuSet(result)
    }

    pub fn is_subset(&self, other: &CpuSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_disjoint(&self, other: &CpuSet) -> bool {
        (&self.0 & &other.0).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CpuId> + '_ {
        self.0.iter()
    }
}

impl Default for CpuSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<CpuId> for CpuSet {
    fn from_iter<T: IntoIterator<Item = CpuId>>(iter: T) -> Self {
        CpuSet(RangeSetBlaze::from_iter(iter))
    }
}

impl FromStr for CpuSet {
    type Err = ParseError;

    /// Parse a CpuSet from a string like "1,2-30,31".
    ///
    /// An empty string is the empty set: an unset cpuset attribute means
    /// "no constraint", which downstream code must be able to distinguish
    /// from a malformed one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result: RangeSetBlaze<usize> = RangeSetBlaze::new();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(CpuSet(result));
        }

        for part in trimmed.split(',') {
            let trimmed = part.trim();
            // either a single number or a dash range
            let range: Vec<&str> = trimmed.split('-').collect();
            match range[..] {
                [l, r] => {
                    let l = l
                        .parse::<usize>()
                        .map_err(|_| ParseError::WrongSpecFormat {
                            raw_str: trimmed.to_string(),
                        })?;
                    let r = r
                        .parse::<usize>()
                        .map_err(|_| ParseError::WrongSpecFormat {
                            raw_str: trimmed.to_string(),
                        })?;
                    if l > r {
                        // ranges_insert would swallow this as an empty range
                        return Err(ParseError::DescendingRange {
                            raw_str: trimmed.to_string(),
                        });
                    }
                    result.ranges_insert(l..=r);
                }
                [value] => {
                    let value =
                        value
                            .parse::<usize>()
                            .map_err(|_| ParseError::WrongSpecFormat {
                                raw_str: trimmed.to_string(),
                            })?;
                    result.insert(value);
                }
                _ => {
                    return Err(ParseError::WrongSpecFormat {
                        raw_str: trimmed.to_string(),
                    });
                }
            }
        }

        Ok(CpuSet(result))
    }
}

impl Display for CpuSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, range) in self.0.ranges().enumerate() {
            if index != 0 {
                write!(f, ",")?;
            };
            let start = range.start();
            let end = range.end();
            if start == end {
                write!(f, "{}", start)?;
            } else {
                write!(f, "{}-{}", start, end)?;
            }
        }
        Ok(())
    }
}

impl Debug for CpuSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_string().as_str())
    }
}

impl Serialize for CpuSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for CpuSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_str = String::deserialize(deserializer)?;
        CpuSet::from_str(raw_str.as_str()).map_err(|e| {
            serde::de::Error::custom(format!("failed to deserialize cpu set {raw_str} {e:?}"))
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse: {raw_str}")]
    WrongSpecFormat { raw_str: String },
    #[error("Range must be ascending: {raw_str}")]
    DescendingRange { raw_str: String },
}
