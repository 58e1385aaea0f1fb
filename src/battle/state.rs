//! Battle states and the transition table between them.

use crate::character::ItemGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Attack,
    Magic,
    Items,
    Run,
}

impl MenuOption {
    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Attack => "Attack",
            MenuOption::Magic => "Magic",
            MenuOption::Items => "Items",
            MenuOption::Run => "Run",
        }
    }
}

/// Main menu entries in display order.
pub const MAIN_MENU_OPTIONS: [MenuOption; 4] = [
    MenuOption::Attack,
    MenuOption::Magic,
    MenuOption::Items,
    MenuOption::Run,
];

/// Name of a state, for UI branching and name-based requests.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StateTag {
    MainMenu,
    TargetSelection,
    PlayerAttack,
    MagicMenu,
    PlayerMagicAttack,
    ItemMenu,
    PlayerItemAttack,
    Run,
    AllyTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl StateTag {
    /// States reachable from `self` in one transition.
    pub fn successors(self) -> &'static [StateTag] {
        use StateTag::*;
        match self {
            MainMenu => &[TargetSelection, PlayerAttack, MagicMenu, ItemMenu, Run],
            TargetSelection => &[PlayerAttack, PlayerMagicAttack, PlayerItemAttack, MainMenu],
            PlayerAttack | PlayerMagicAttack | PlayerItemAttack => &[AllyTurn, Victory],
            MagicMenu => &[TargetSelection, PlayerMagicAttack, AllyTurn, MainMenu],
            ItemMenu => &[TargetSelection, PlayerItemAttack, AllyTurn, MainMenu],
            Run => &[AllyTurn],
            AllyTurn => &[EnemyTurn, Victory],
            EnemyTurn => &[MainMenu, Defeat],
            Victory | Defeat => &[],
        }
    }

    pub fn can_transition_to(self, next: StateTag) -> bool {
        self.successors().contains(&next)
    }
}

/// What a target selection will do once a target is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Attack,
    /// Spell id.
    Spell(String),
    /// Item display name.
    Item(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelectionParams {
    pub action: PendingAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAttackParams {
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicAttackParams {
    pub target: usize,
    pub spell: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAttackParams {
    pub target: usize,
    pub item: String,
}

/// A request to replace the current state, carrying the new state's
/// entry parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    MainMenu,
    TargetSelection(TargetSelectionParams),
    PlayerAttack(PlayerAttackParams),
    MagicMenu { spells: Vec<String> },
    PlayerMagicAttack(MagicAttackParams),
    ItemMenu { entries: Vec<ItemGroup> },
    PlayerItemAttack(ItemAttackParams),
    Run,
    AllyTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl Transition {
    pub fn target(&self) -> StateTag {
        match self {
            Transition::MainMenu => StateTag::MainMenu,
            Transition::TargetSelection(_) => StateTag::TargetSelection,
            Transition::PlayerAttack(_) => StateTag::PlayerAttack,
            Transition::MagicMenu { .. } => StateTag::MagicMenu,
            Transition::PlayerMagicAttack(_) => StateTag::PlayerMagicAttack,
            Transition::ItemMenu { .. } => StateTag::ItemMenu,
            Transition::PlayerItemAttack(_) => StateTag::PlayerItemAttack,
            Transition::Run => StateTag::Run,
            Transition::AllyTurn => StateTag::AllyTurn,
            Transition::EnemyTurn => StateTag::EnemyTurn,
            Transition::Victory => StateTag::Victory,
            Transition::Defeat => StateTag::Defeat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("transition from {from} to {to} is not allowed")]
    NotAllowed { from: StateTag, to: StateTag },
    #[error("unknown battle state '{0}'")]
    UnknownState(String),
    #[error("state {0} cannot be requested without parameters")]
    MissingParameters(StateTag),
}

/// The live battle state. Menus own their cursor; resolving states own the
/// parameters they were entered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleState {
    MainMenu { selected: usize },
    TargetSelection { selected: usize, action: PendingAction },
    PlayerAttack { target: usize },
    MagicMenu { spells: Vec<String>, selected: usize },
    PlayerMagicAttack { target: usize, spell: String },
    ItemMenu { entries: Vec<ItemGroup>, selected: usize },
    PlayerItemAttack { target: usize, item: String },
    Run,
    AllyTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl Default for BattleState {
    fn default() -> Self {
        BattleState::MainMenu { selected: 0 }
    }
}

impl BattleState {
    pub fn tag(&self) -> StateTag {
        match self {
            BattleState::MainMenu { .. } => StateTag::MainMenu,
            BattleState::TargetSelection { .. } => StateTag::TargetSelection,
            BattleState::PlayerAttack { .. } => StateTag::PlayerAttack,
            BattleState::MagicMenu { .. } => StateTag::MagicMenu,
            BattleState::PlayerMagicAttack { .. } => StateTag::PlayerMagicAttack,
            BattleState::ItemMenu { .. } => StateTag::ItemMenu,
            BattleState::PlayerItemAttack { .. } => StateTag::PlayerItemAttack,
            BattleState::Run => StateTag::Run,
            BattleState::AllyTurn => StateTag::AllyTurn,
            BattleState::EnemyTurn => StateTag::EnemyTurn,
            BattleState::Victory => StateTag::Victory,
            BattleState::Defeat => StateTag::Defeat,
        }
    }
}

/// Validates `request` against the transition table and builds the fresh
/// state it enters. Menus always start with the cursor on the first entry.
pub fn transition(current: StateTag, request: Transition) -> Result<BattleState, TransitionError> {
    let to = request.target();
    if !current.can_transition_to(to) {
        return Err(TransitionError::NotAllowed { from: current, to });
    }
    Ok(match request {
        Transition::MainMenu => BattleState::MainMenu { selected: 0 },
        Transition::TargetSelection(params) => BattleState::TargetSelection {
            selected: 0,
            action: params.action,
        },
        Transition::PlayerAttack(params) => BattleState::PlayerAttack {
            target: params.target,
        },
        Transition::MagicMenu { spells } => BattleState::MagicMenu { spells, selected: 0 },
        Transition::PlayerMagicAttack(params) => BattleState::PlayerMagicAttack {
            target: params.target,
            spell: params.spell,
        },
        Transition::ItemMenu { entries } => BattleState::ItemMenu { entries, selected: 0 },
        Transition::PlayerItemAttack(params) => BattleState::PlayerItemAttack {
            target: params.target,
            item: params.item,
        },
        Transition::Run => BattleState::Run,
        Transition::AllyTurn => BattleState::AllyTurn,
        Transition::EnemyTurn => BattleState::EnemyTurn,
        Transition::Victory => BattleState::Victory,
        Transition::Defeat => BattleState::Defeat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tags_parse_from_snake_case() {
        assert_eq!(StateTag::from_str("player_magic_attack"), Ok(StateTag::PlayerMagicAttack));
        assert_eq!(StateTag::EnemyTurn.to_string(), "enemy_turn");
        assert!(StateTag::from_str("boss_rush").is_err());
    }

    #[test]
    fn test_main_menu_to_run_allowed() {
        let state = transition(StateTag::MainMenu, Transition::Run).unwrap();
        assert_eq!(state, BattleState::Run);
    }

    #[test]
    fn test_enemy_turn_cannot_reach_victory() {
        let err = transition(StateTag::EnemyTurn, Transition::Victory).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAllowed {
                from: StateTag::EnemyTurn,
                to: StateTag::Victory
            }
        );
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for tag in StateTag::iter() {
            assert!(!StateTag::Victory.can_transition_to(tag));
            assert!(!StateTag::Defeat.can_transition_to(tag));
        }
        assert!(StateTag::Defeat.successors().is_empty());
        assert!(!StateTag::AllyTurn.successors().is_empty());
    }

    #[test]
    fn test_player_actions_reach_victory() {
        for tag in [
            StateTag::PlayerAttack,
            StateTag::PlayerMagicAttack,
            StateTag::PlayerItemAttack,
            StateTag::AllyTurn,
        ] {
            assert!(tag.can_transition_to(StateTag::Victory), "{tag}");
        }
        assert!(!StateTag::Run.can_transition_to(StateTag::Victory));
    }

    #[test]
    fn test_only_enemy_turn_reaches_defeat() {
        for tag in StateTag::iter() {
            assert_eq!(
                tag.can_transition_to(StateTag::Defeat),
                tag == StateTag::EnemyTurn
            );
        }
    }

    #[test]
    fn test_menus_are_rebuilt_with_cursor_at_top() {
        let state = transition(
            StateTag::MainMenu,
            Transition::MagicMenu {
                spells: vec!["heal".to_string()],
            },
        )
        .unwrap();
        assert_eq!(
            state,
            BattleState::MagicMenu {
                spells: vec!["heal".to_string()],
                selected: 0
            }
        );
        assert_eq!(state.tag(), StateTag::MagicMenu);
    }

    #[test]
    fn test_target_selection_carries_pending_spell() {
        let request = Transition::TargetSelection(TargetSelectionParams {
            action: PendingAction::Spell("fireball".to_string()),
        });
        let state = transition(StateTag::MagicMenu, request).unwrap();
        assert!(matches!(
            state,
            BattleState::TargetSelection { selected: 0, action: PendingAction::Spell(ref id) } if id == "fireball"
        ));
    }
}
