//! Population
//!
//! A well-mixed herd of agents and the pairwise interaction that drives the
//! naming game.

use rand::Rng;
use serde::Serialize;

use crate::agent::{Agent, Norm};
use crate::error::{Result, SimError};

/// Smallest population in which two distinct agents can meet.
pub const MIN_POPULATION: usize = 2;

/// Record of a single speaker/hearer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub speaker: usize,
    pub hearer: usize,
    pub word: Norm,
    /// Hearer already knew the word and both parties collapsed to it
    pub aligned: bool,
}

/// How many agents hold each kind of memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    pub only_a: usize,
    pub only_b: usize,
    pub mixed: usize,
}

/// Fixed-size collection of agents.
///
/// The first `committed_count` agents are committed to `A`; the rest start
/// out holding `B`.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    committed_fraction: f64,
    committed_count: usize,
}

impl Population {
    /// Build a population of `size` agents.
    ///
    /// `committed_count` is `round(committed_fraction * size)`, rounding
    /// halves away from zero, so the realized fraction may differ slightly
    /// from the requested one.
    pub fn new(size: usize, committed_fraction: f64) -> Result<Self> {
        if size < MIN_POPULATION {
            return Err(SimError::invalid(format!(
                "population size must be at least {}, got {}",
                MIN_POPULATION, size
            )));
        }
        if !(0.0..=1.0).contains(&committed_fraction) {
            return Err(SimError::invalid(format!(
                "committed fraction must be within [0, 1], got {}",
                committed_fraction
            )));
        }

        let committed_count = committed_count(size, committed_fraction);
        let agents = (0..size)
            .map(|id| {
                if id < committed_count {
                    Agent::committed(id)
                } else {
                    Agent::uncommitted(id)
                }
            })
            .collect();

        Ok(Self {
            agents,
            committed_fraction,
            committed_count,
        })
    }

    pub fn size(&self) -> usize {
        self.agents.len()
    }

    pub fn committed_fraction(&self) -> f64 {
        self.committed_fraction
    }

    pub fn committed_count(&self) -> usize {
        self.committed_count
    }

    /// Fraction of agents actually committed after rounding.
    pub fn realized_fraction(&self) -> f64 {
        self.committed_count as f64 / self.size() as f64
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// Count agents by memory contents.
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for agent in &self.agents {
            let memory = agent.memory();
            if memory.is_singleton(Norm::A) {
                census.only_a += 1;
            } else if memory.is_singleton(Norm::B) {
                census.only_b += 1;
            } else {
                census.mixed += 1;
            }
        }
        census
    }

    /// Run one interaction and return the spoken word.
    pub fn interact<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Norm {
        self.interact_traced(rng).word
    }

    /// Run one interaction and return the full exchange.
    ///
    /// A random speaker says a word to a distinct random hearer. If the
    /// hearer already knows the word both collapse to it, otherwise the
    /// hearer learns it. A committed hearer always ends up holding only `A`.
    pub fn interact_traced<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction {
        let size = self.agents.len();
        let speaker = rng.gen_range(0..size);
        let mut hearer = rng.gen_range(0..size);
        while hearer == speaker {
            hearer = rng.gen_range(0..size);
        }

        let word = self.agents[speaker].speak(rng);

        let aligned = self.agents[hearer].memory().contains(word);
        if aligned {
            self.agents[speaker].memory_mut().collapse_to(word);
            self.agents[hearer].memory_mut().collapse_to(word);
        } else {
            self.agents[hearer].memory_mut().insert(word);
        }

        if self.agents[hearer].is_committed() {
            self.agents[hearer].memory_mut().collapse_to(Norm::COMMITTED);
        }

        Interaction {
            speaker,
            hearer,
            word,
            aligned,
        }
    }
}

/// `round(fraction * size)` with halves rounded away from zero.
pub fn committed_count(size: usize, fraction: f64) -> usize {
    (fraction * size as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Population::new(0, 0.1).is_err());
        assert!(Population::new(1, 0.1).is_err());
        assert!(Population::new(10, -0.01).is_err());
        assert!(Population::new(10, 1.01).is_err());
        assert!(Population::new(10, f64::NAN).is_err());
        assert!(Population::new(2, 0.0).is_ok());
        assert!(Population::new(2, 1.0).is_ok());
    }

    #[test]
    fn test_committed_split() {
        let population = Population::new(100, 0.12).unwrap();
        assert_eq!(population.committed_count(), 12);
        assert_eq!(population.size(), 100);

        for (index, agent) in population.agents().iter().enumerate() {
            assert_eq!(agent.id(), index);
            assert_eq!(agent.is_committed(), index < 12);
            let expected = if index < 12 { Norm::A } else { Norm::B };
            assert!(agent.memory().is_singleton(expected));
        }
    }

    #[test]
    fn test_rounding_preserved() {
        // 0.05 * 10 rounds half away from zero
        assert_eq!(committed_count(10, 0.05), 1);
        assert_eq!(committed_count(10, 0.14), 1);
        assert_eq!(committed_count(10, 0.16), 2);
        assert_eq!(committed_count(7, 0.3), 2);

        let population = Population::new(7, 0.3).unwrap();
        assert_eq!(population.committed_count(), 2);
        assert!((population.realized_fraction() - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(population.committed_fraction(), 0.3);
    }

    #[test]
    fn test_speaker_and_hearer_distinct() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut population = Population::new(2, 0.5).unwrap();
        for _ in 0..1000 {
            let interaction = population.interact_traced(&mut rng);
            assert_ne!(interaction.speaker, interaction.hearer);
        }
    }

    #[test]
    fn test_committed_memory_stays_fixed() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut population = Population::new(20, 0.25).unwrap();
        for _ in 0..5000 {
            population.interact(&mut rng);
            for agent in population.agents().iter().filter(|a| a.is_committed()) {
                assert!(agent.memory().is_singleton(Norm::A));
            }
        }
    }

    #[test]
    fn test_alignment_collapses_both_parties() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut population = Population::new(2, 0.0).unwrap();
        // Both agents hold only B, so every exchange is an alignment on B
        let interaction = population.interact_traced(&mut rng);
        assert_eq!(interaction.word, Norm::B);
        assert!(interaction.aligned);
        assert_eq!(population.census().only_b, 2);
    }

    #[test]
    fn test_failed_exchange_grows_hearer_memory() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut population = Population::new(2, 0.5).unwrap();
        // Agent 0 is committed, agent 1 holds B
        loop {
            let interaction = population.interact_traced(&mut rng);
            if interaction.speaker == 0 {
                assert_eq!(interaction.word, Norm::A);
                assert!(!interaction.aligned);
                let hearer = population.agent(1).unwrap();
                assert!(hearer.memory().contains(Norm::A));
                assert!(hearer.memory().contains(Norm::B));
                break;
            }
            // Agent 1 spoke B to the committed agent, which stays on A
            assert!(population.agent(0).unwrap().memory().is_singleton(Norm::A));
        }
        assert_eq!(population.census().mixed, 1);
    }

    #[test]
    fn test_interact_returns_spoken_word() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = Population::new(4, 1.0).unwrap();
        for _ in 0..100 {
            assert_eq!(population.interact(&mut rng), Norm::A);
        }
    }
}
