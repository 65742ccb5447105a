//! Score, reward scaling and the collection bag

use serde::{Deserialize, Serialize};

use super::entity::{CollectibleKind, SecretKind, VisualId};
use crate::consts::*;

/// Tunables for scoring and speed scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRules {
    /// Reward for the first collectibles, and the amount it grows by
    pub reward_increment: u64,
    /// Collections between reward increases
    pub reward_interval: u64,
    /// Flat bonus for a secret
    pub secret_bonus: u64,
    /// Score per extra multiple of base speed
    pub speed_threshold: u64,
    pub max_speed_multiplier: u32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            reward_increment: REWARD_INCREMENT,
            reward_interval: REWARD_INTERVAL,
            secret_bonus: SECRET_BONUS,
            speed_threshold: SPEED_THRESHOLD,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,
        }
    }
}

impl ScoreRules {
    /// `min(1 + score / speed_threshold, max)`
    pub fn speed_multiplier(&self, score: u64) -> u32 {
        let steps = score / self.speed_threshold.max(1);
        let max = self.max_speed_multiplier.max(1) as u64;
        (1 + steps).min(max) as u32
    }
}

/// Speed multiplier with the default rules
pub fn speed_multiplier(score: u64) -> u32 {
    ScoreRules::default().speed_multiplier(score)
}

/// Running score for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub reward_per_collectible: u64,
    pub total_collected: u64,
    rules: ScoreRules,
}

impl ScoreState {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            score: 0,
            reward_per_collectible: rules.reward_increment,
            total_collected: 0,
            rules,
        }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    /// Score a collectible; every `reward_interval`th one raises the reward
    /// for the ones after it.
    pub fn on_collect(&mut self) {
        self.total_collected += 1;
        self.score += self.reward_per_collectible;
        if self.total_collected % self.rules.reward_interval.max(1) == 0 {
            self.reward_per_collectible += self.rules.reward_increment;
            log::debug!(
                "Reward per collectible now {} after {} collected",
                self.reward_per_collectible,
                self.total_collected
            );
        }
    }

    pub fn on_secret_collect(&mut self) {
        self.score += self.rules.secret_bonus;
    }

    /// Debug hook: add points directly
    pub fn add_points(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Current movement multiplier, always derived from the live score
    pub fn speed_multiplier(&self) -> u32 {
        self.rules.speed_multiplier(self.score)
    }
}

/// Per-kind collection counts shown in the bag HUD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedCounts {
    counts: [u64; 3],
}

impl CollectedCounts {
    pub fn record(&mut self, kind: CollectibleKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: CollectibleKind) -> u64 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// (kind, count) pairs in bag order
    pub fn iter(&self) -> impl Iterator<Item = (CollectibleKind, u64)> + '_ {
        CollectibleKind::ALL.iter().map(|&k| (k, self.get(k)))
    }
}

/// Whether each secret is held, plus the bag visual once it is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSlot {
    pub collected: bool,
    #[serde(skip)]
    pub visual: Option<VisualId>,
}

/// Secret possession for the session. Once collected, a secret never spawns
/// again until restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPossession {
    slots: [SecretSlot; 2],
}

/// HUD summary of which secrets are held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsHeld {
    pub a: bool,
    pub b: bool,
}

impl SecretPossession {
    pub fn collect(&mut self, kind: SecretKind, visual: Option<VisualId>) {
        self.slots[kind.index()] = SecretSlot {
            collected: true,
            visual,
        };
    }

    pub fn is_collected(&self, kind: SecretKind) -> bool {
        self.slots[kind.index()].collected
    }

    pub fn slot(&self, kind: SecretKind) -> &SecretSlot {
        &self.slots[kind.index()]
    }

    pub fn held(&self) -> SecretsHeld {
        SecretsHeld {
            a: self.is_collected(SecretKind::A),
            b: self.is_collected(SecretKind::B),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_speed_multiplier_examples() {
        assert_eq!(speed_multiplier(0), 1);
        assert_eq!(speed_multiplier(99), 1);
        assert_eq!(speed_multiplier(100), 2);
        assert_eq!(speed_multiplier(250), 3);
        assert_eq!(speed_multiplier(999), 6);
        assert_eq!(speed_multiplier(10_000), 6);
    }

    #[test]
    fn test_reward_steps_every_tenth_collection() {
        let mut score = ScoreState::new(ScoreRules::default());
        for _ in 0..9 {
            score.on_collect();
        }
        assert_eq!(score.reward_per_collectible, 5);
        assert_eq!(score.score, 45);

        // 10th still pays 5, then the reward rises
        score.on_collect();
        assert_eq!(score.score, 50);
        assert_eq!(score.reward_per_collectible, 10);

        score.on_collect();
        assert_eq!(score.score, 60);
        assert_eq!(score.total_collected, 11);
    }

    #[test]
    fn test_secret_bonus_is_flat() {
        let mut score = ScoreState::new(ScoreRules::default());
        for _ in 0..25 {
            score.on_collect();
        }
        let before = score.score;
        score.on_secret_collect();
        assert_eq!(score.score, before + 500);
    }

    #[test]
    fn test_speed_multiplier_tracks_live_score() {
        let mut score = ScoreState::new(ScoreRules::default());
        assert_eq!(score.speed_multiplier(), 1);
        score.add_points(1000);
        assert_eq!(score.speed_multiplier(), 6);
    }

    #[test]
    fn test_collected_counts() {
        let mut counts = CollectedCounts::default();
        counts.record(CollectibleKind::Rex);
        counts.record(CollectibleKind::Rex);
        counts.record(CollectibleKind::Bronto);
        assert_eq!(counts.get(CollectibleKind::Rex), 2);
        assert_eq!(counts.get(CollectibleKind::Trike), 0);
        assert_eq!(counts.total(), 3);
        let listed: Vec<_> = counts.iter().collect();
        assert_eq!(listed[2], (CollectibleKind::Bronto, 1));
    }

    #[test]
    fn test_secret_possession() {
        let mut secrets = SecretPossession::default();
        assert_eq!(secrets.held(), SecretsHeld::default());
        secrets.collect(SecretKind::B, Some(VisualId(3)));
        assert!(secrets.is_collected(SecretKind::B));
        assert!(!secrets.is_collected(SecretKind::A));
        assert_eq!(secrets.slot(SecretKind::B).visual, Some(VisualId(3)));
        assert_eq!(secrets.held(), SecretsHeld { a: false, b: true });
    }

    proptest! {
        #[test]
        fn speed_multiplier_bounded_and_monotonic(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let m_lo = speed_multiplier(lo);
            let m_hi = speed_multiplier(hi);
            prop_assert!((1..=6).contains(&m_lo));
            prop_assert!((1..=6).contains(&m_hi));
            prop_assert!(m_lo <= m_hi);
        }

        #[test]
        fn reward_follows_collection_count(n in 0u64..200) {
            let mut score = ScoreState::new(ScoreRules::default());
            let mut last_reward = score.reward_per_collectible;
            for _ in 0..n {
                score.on_collect();
                prop_assert!(score.reward_per_collectible >= last_reward);
                last_reward = score.reward_per_collectible;
            }
            prop_assert_eq!(score.reward_per_collectible, 5 + 5 * (n / 10));
        }
    }
}
