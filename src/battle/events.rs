/// Sound cues the host may play. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Menu,
    Attack,
    Magic,
    Hit,
    Drink,
}

/// Notifications for the hosting scene, drained after each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    Sound(Sound),
    CombatLog(String),
    SystemLog(String),
    /// An enemy fell; for kill-quest tracking.
    EnemyKilled { type_tag: String },
    /// The player acknowledged a defeat.
    ReturnToTitle,
}

/// What the encounter has earned so far. Applied to the player at Victory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u64,
    pub gold: u64,
    /// Item ids that dropped.
    pub items: Vec<String>,
}

impl Rewards {
    pub fn add(&mut self, xp: u64, gold: u64) {
        self.xp = self.xp.saturating_add(xp);
        self.gold = self.gold.saturating_add(gold);
    }
}
