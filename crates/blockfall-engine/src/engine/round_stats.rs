use serde::Serialize;

/// Statistics of a round.
///
/// - **Score**: total number of rows cleared
/// - **Completed pieces**: number of pieces locked into the grid
/// - **Line clear distribution**: how many locks cleared 0, 1, 2, 3 or 4 rows
///
/// # Example
///
/// ```
/// use blockfall_engine::RoundStats;
///
/// let mut stats = RoundStats::new();
/// stats.record_lock(0);
/// stats.record_lock(2);
///
/// assert_eq!(stats.score(), 2);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStats {
    score: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for RoundStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the score: the number of rows cleared so far.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index `n` counts the locks that cleared `n` rows. A piece spans at most
    /// four rows, so a lock never clears more than four.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates the statistics after a piece is locked.
    pub const fn record_lock(&mut self, cleared_rows: usize) {
        self.completed_pieces += 1;
        self.score += cleared_rows;
        if cleared_rows < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_rows] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accumulates_cleared_rows() {
        let mut stats = RoundStats::new();
        for cleared in [1, 0, 4, 3, 0] {
            stats.record_lock(cleared);
        }
        assert_eq!(stats.score(), 8);
        assert_eq!(stats.completed_pieces(), 5);
        assert_eq!(stats.line_cleared_counter(), &[2, 1, 0, 1, 1]);
    }

    #[test]
    fn test_serialization() {
        let mut stats = RoundStats::new();
        stats.record_lock(1);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(
            json,
            r#"{"score":1,"completed_pieces":1,"line_cleared_counter":[0,1,0,0,0]}"#
        );
    }
}
