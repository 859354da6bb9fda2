use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::model::Choice;

/// Picks the non-human side's choice for each round.
pub trait OpponentSelector {
    fn select(&mut self) -> Choice;
}

/// Uniform pick over the three choices, drawing from an injected RNG.
#[derive(Debug, Clone)]
pub struct RandomOpponent<R: Rng = StdRng> {
    rng: R,
}

impl RandomOpponent<StdRng> {
    /// Seeds from the given value, or from thread entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(rand::rng().next_u64());
        trace!(target: "opponent", "Seeding opponent with {}", seed);
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl<R: Rng> RandomOpponent<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> OpponentSelector for RandomOpponent<R> {
    fn select(&mut self) -> Choice {
        Choice::from_index(self.rng.random_range(0..Choice::ALL.len()))
    }
}

/// Replays a fixed sequence of choices, wrapping around at the end.
/// An empty script always plays rock.
#[derive(Debug, Clone)]
pub struct ScriptedOpponent {
    script: Vec<Choice>,
    position: usize,
}

impl ScriptedOpponent {
    pub fn new(script: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            script: script.into_iter().collect(),
            position: 0,
        }
    }

    pub fn always(choice: Choice) -> Self {
        Self::new([choice])
    }
}

impl OpponentSelector for ScriptedOpponent {
    fn select(&mut self) -> Choice {
        if self.script.is_empty() {
            return Choice::Rock;
        }
        let choice = self.script[self.position % self.script.len()];
        self.position += 1;
        choice
    }
}
