use crate::engine::Snapshot;

/// Points earned across rounds in this process. Never persisted.
#[derive(Debug, Clone)]
pub struct SessionScore {
    total: u32,
    best: u32,
    rounds: u32,
    round_score: u32,
    round_over: bool,
}

impl Default for SessionScore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionScore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: 0,
            best: 0,
            rounds: 0,
            round_score: 0,
            round_over: false,
        }
    }

    /// Adds `points` to the session total.
    pub fn add(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
    }

    /// Folds one engine snapshot into the session.
    ///
    /// Score increases are credited once; a snapshot with a lower score marks
    /// the start of a new round.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        if snapshot.score < self.round_score {
            self.round_score = 0;
            self.round_over = false;
        }

        if snapshot.score > self.round_score {
            self.add(snapshot.score - self.round_score);
            self.round_score = snapshot.score;
        }

        self.best = self.best.max(snapshot.score);

        if snapshot.is_over() && !self.round_over {
            self.round_over = true;
            self.rounds += 1;
        } else if !snapshot.is_over() {
            self.round_over = false;
        }
    }

    /// Clears the session, as the footer "Reset" control does.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Best single-round score this session.
    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Rounds that ended (death or full board) this session.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
