use blockfall_engine::{ConfigError, Motion, PieceSeed, Round, RoundConfig};
use serde::{Deserialize, Serialize};

/// Motions requested during a round, tick by tick.
///
/// Together with the seed and configuration this fully determines a round,
/// so playing the script back reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionScript {
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    /// Round configuration (defaults apply to missing fields)
    #[serde(default)]
    pub config: RoundConfig,
    /// Motion requests of each tick; when a tick has several, the last wins
    #[serde(default)]
    pub ticks: Vec<Vec<Motion>>,
}

impl MotionScript {
    pub fn new(seed: PieceSeed, config: RoundConfig) -> Self {
        Self {
            seed,
            config,
            ticks: vec![],
        }
    }

    /// Appends a tick with at most one motion request.
    pub fn push_tick(&mut self, motion: Motion) {
        let requests = match motion {
            Motion::None => vec![],
            motion => vec![motion],
        };
        self.ticks.push(requests);
    }

    /// Plays the script on a fresh round.
    ///
    /// Stops early when the round ends; remaining ticks are ignored.
    pub fn play(&self) -> Result<Round, ConfigError> {
        let mut round = Round::with_seed(self.config.clone(), self.seed)?;
        for requests in &self.ticks {
            if round.state().is_game_over() {
                break;
            }
            for &motion in requests {
                round.request_motion(motion);
            }
            round.tick();
        }
        Ok(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script: MotionScript = serde_json::from_str(
            r#"{
                "seed": "000102030405060708090a0b0c0d0e0f",
                "config": { "rows": 8, "cols": 6 },
                "ticks": [["move-left", "move-right"], [], ["hard-drop"]]
            }"#,
        )
        .unwrap();
        assert_eq!(script.config.rows, 8);
        assert_eq!(script.config.gravity_interval, 20);
        assert_eq!(
            script.ticks,
            vec![
                vec![Motion::MoveLeft, Motion::MoveRight],
                vec![],
                vec![Motion::HardDrop],
            ]
        );

        let round = script.play().unwrap();
        assert_eq!(round.ticks(), 3);
        assert_eq!(round.stats().completed_pieces(), 1);

        // the right move won on the first tick
        let right_only = MotionScript {
            ticks: vec![vec![Motion::MoveRight], vec![], vec![Motion::HardDrop]],
            ..script.clone()
        };
        assert_eq!(right_only.play().unwrap().grid(), round.grid());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let script: MotionScript =
            serde_json::from_str(r#"{ "seed": "0000000000000000000000000000002a" }"#).unwrap();
        assert_eq!(script.config, RoundConfig::default());
        assert!(script.ticks.is_empty());
        assert_eq!(script.play().unwrap().ticks(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut script = MotionScript::new(PieceSeed::from_bytes([0; 16]), RoundConfig::default());
        script.config.num_colors = 0;
        assert_eq!(script.play().unwrap_err(), ConfigError::EmptyPalette);
    }

    #[test]
    fn test_play_stops_at_game_over() {
        let mut script = MotionScript::new(PieceSeed::from_bytes([9; 16]), RoundConfig::default());
        for _ in 0..1000 {
            script.push_tick(Motion::HardDrop);
        }
        let round = script.play().unwrap();
        assert!(round.state().is_game_over());
        assert!(round.ticks() < 1000);
    }
}
