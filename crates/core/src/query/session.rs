//! Operator context for one console.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::world::{CompanyId, World};

/// Whether a game or the scenario editor is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    /// A running game.
    #[default]
    Normal,
    /// The scenario editor.
    Editor,
}

/// Operator context handed to every invocation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Company the operator plays as.
    pub local_company: Option<CompanyId>,
    /// Game or editor.
    pub mode: GameMode,
    /// Other players are connected.
    pub networked: bool,
    rng: SmallRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session without a company, seeded from system entropy.
    pub fn new() -> Self {
        Self {
            local_company: None,
            mode: GameMode::Normal,
            networked: false,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Play as `company`.
    pub fn with_company(mut self, company: Option<CompanyId>) -> Self {
        self.local_company = company;
        self
    }

    /// Run in `mode`.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark the session as shared with other players.
    pub fn networked(mut self, networked: bool) -> Self {
        self.networked = networked;
        self
    }

    /// Replace the random generator with a deterministic one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// True inside the scenario editor.
    pub fn in_editor(&self) -> bool {
        self.mode == GameMode::Editor
    }

    /// The operator's company, if it exists in `world`.
    pub fn company(&self, world: &dyn World) -> Option<CompanyId> {
        self.local_company
            .filter(|&company| world.company(company).is_some())
    }

    /// Random signed order offset.
    pub fn random_offset(&mut self) -> i64 {
        i64::from(self.rng.gen::<i32>())
    }
}
