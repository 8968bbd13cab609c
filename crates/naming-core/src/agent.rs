//! Agents
//!
//! Norm labels, the set-typed memory each agent owns, and the speak action.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SimError};

/// A label agents can speak.
///
/// `A` is the new norm pushed by committed agents, `B` the incumbent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Norm {
    A,
    B,
}

impl Norm {
    /// The norm committed agents always speak.
    pub const COMMITTED: Norm = Norm::A;
    /// The norm the rest of the population starts with.
    pub const INCUMBENT: Norm = Norm::B;
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Norm::A => write!(f, "A"),
            Norm::B => write!(f, "B"),
        }
    }
}

/// The set of norms an agent currently considers valid.
///
/// Kept sorted and free of duplicates so that uniform selection is
/// reproducible under a seeded generator. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    labels: Vec<Norm>,
}

impl Memory {
    /// Memory holding exactly one norm.
    pub fn singleton(norm: Norm) -> Self {
        Self { labels: vec![norm] }
    }

    /// Build a memory from any collection of norms, dropping duplicates.
    pub fn from_norms(norms: impl IntoIterator<Item = Norm>) -> Result<Self> {
        let mut labels: Vec<Norm> = norms.into_iter().collect();
        if labels.is_empty() {
            return Err(SimError::invalid("agent memory must hold at least one norm"));
        }
        labels.sort_unstable();
        labels.dedup();
        Ok(Self { labels })
    }

    pub fn contains(&self, norm: Norm) -> bool {
        self.labels.binary_search(&norm).is_ok()
    }

    /// Add a norm. Returns false if it was already present.
    pub fn insert(&mut self, norm: Norm) -> bool {
        match self.labels.binary_search(&norm) {
            Ok(_) => false,
            Err(pos) => {
                self.labels.insert(pos, norm);
                true
            }
        }
    }

    /// Replace the whole memory with a single norm.
    pub fn collapse_to(&mut self, norm: Norm) {
        self.labels.clear();
        self.labels.push(norm);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Never true for a constructed memory.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_singleton(&self, norm: Norm) -> bool {
        self.labels.as_slice() == [norm]
    }

    pub fn iter(&self) -> impl Iterator<Item = Norm> + '_ {
        self.labels.iter().copied()
    }

    /// Pick one norm uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Norm {
        self.labels[rng.gen_range(0..self.labels.len())]
    }
}

/// A single member of the population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: usize,
    memory: Memory,
    committed: bool,
}

impl Agent {
    /// Create an agent with the given starting memory.
    ///
    /// Fails with `InvalidArgument` if `memory` is empty.
    pub fn new(id: usize, memory: impl IntoIterator<Item = Norm>, committed: bool) -> Result<Self> {
        Ok(Self {
            id,
            memory: Memory::from_norms(memory)?,
            committed,
        })
    }

    /// A committed agent holding only the committed norm.
    pub fn committed(id: usize) -> Self {
        Self {
            id,
            memory: Memory::singleton(Norm::COMMITTED),
            committed: true,
        }
    }

    /// An ordinary agent starting with the incumbent norm.
    pub fn uncommitted(id: usize) -> Self {
        Self {
            id,
            memory: Memory::singleton(Norm::INCUMBENT),
            committed: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub(crate) fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Choose a word to say.
    ///
    /// Committed agents always say the committed norm and draw nothing from
    /// `rng`; everyone else picks uniformly from memory.
    pub fn speak<R: Rng + ?Sized>(&self, rng: &mut R) -> Norm {
        if self.committed {
            Norm::COMMITTED
        } else {
            self.memory.choose(rng)
        }
    }
}
