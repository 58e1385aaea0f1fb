//! The battle aggregate: one encounter, one live state at a time.
//!
//! A host forwards each input with [`Battle::handle_input`], advances time
//! with [`Battle::update`] and renders with [`Battle::draw`]. Everything an
//! input triggers, up to and including victory, resolves inside that call.

mod events;
mod input;
mod state;
mod turns;

pub use events::{BattleEvent, Rewards, Sound};
pub use input::BattleInput;
pub use state::{
    transition, BattleState, ItemAttackParams, MagicAttackParams, MenuOption, PendingAction,
    PlayerAttackParams, StateTag, TargetSelectionParams, Transition, TransitionError,
    MAIN_MENU_OPTIONS,
};

use crate::catalog::{GameData, ItemKind};
use crate::character::{ItemGroup, Player};
use crate::combat::{Combatant, Enemy, ScriptedBehavior, DUO_INTRO};
use crate::ui::battle_scene;
use crate::ui::combat_effects::EffectQueue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::Frame;
use std::str::FromStr;
use std::sync::Arc;

pub struct Battle<R: Rng = StdRng> {
    data: Arc<GameData>,
    player: Player,
    allies: Vec<Combatant>,
    enemies: Vec<Enemy>,
    state: BattleState,
    rewards: Rewards,
    effects: EffectQueue,
    message: String,
    active: bool,
    /// Both halves of the scripted duo were present at the start.
    duo_encounter: bool,
    events: Vec<BattleEvent>,
    rng: R,
}

impl Battle<StdRng> {
    pub fn new(
        data: Arc<GameData>,
        player: Player,
        enemies: Vec<Enemy>,
        allies: Vec<Combatant>,
    ) -> Self {
        Self::with_rng(data, player, enemies, allies, StdRng::from_entropy())
    }
}

impl<R: Rng> Battle<R> {
    pub fn with_rng(
        data: Arc<GameData>,
        player: Player,
        enemies: Vec<Enemy>,
        allies: Vec<Combatant>,
        rng: R,
    ) -> Self {
        let has_script =
            |script: ScriptedBehavior| enemies.iter().any(|e| e.script == Some(script));
        let duo_encounter =
            has_script(ScriptedBehavior::DarylLedeay) && has_script(ScriptedBehavior::ChickenGeorge);

        let opening = if duo_encounter {
            DUO_INTRO.to_string()
        } else {
            let names: Vec<&str> = enemies.iter().map(|e| e.name()).collect();
            format!("A wild {} appeared!", names.join(", "))
        };

        let mut battle = Self {
            data,
            player,
            allies,
            enemies,
            state: BattleState::default(),
            rewards: Rewards::default(),
            effects: EffectQueue::new(),
            message: String::new(),
            active: true,
            duo_encounter,
            events: Vec::new(),
            rng,
        };
        tracing::debug!(
            enemies = battle.enemies.len(),
            allies = battle.allies.len(),
            duo = duo_encounter,
            "battle started"
        );
        battle.narrate(opening);
        battle
    }

    pub fn handle_input(&mut self, input: BattleInput) {
        if !self.active {
            return;
        }
        match input {
            BattleInput::Up => self.move_cursor(-1),
            BattleInput::Down => self.move_cursor(1),
            BattleInput::Confirm => self.confirm(),
            BattleInput::Cancel => self.cancel(),
            BattleInput::Other => {}
        }
    }

    /// Advances visual effects by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        self.effects.advance(dt);
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        battle_scene::draw_battle(frame, area, self);
    }

    /// Name-based transition request for hosts and debugging. Unknown or
    /// disallowed names are logged and ignored.
    pub fn request_state(&mut self, name: &str) {
        match self.named_request(name) {
            Ok(request) => self.change_state(request),
            Err(err) => tracing::warn!(%err, "ignored battle state request"),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_tag(&self) -> StateTag {
        self.state.tag()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn allies(&self) -> &[Combatant] {
        &self.allies
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hands the player back to the host once the battle is over.
    pub fn into_player(self) -> Player {
        self.player
    }

    fn named_request(&self, name: &str) -> Result<Transition, TransitionError> {
        let tag =
            StateTag::from_str(name).map_err(|_| TransitionError::UnknownState(name.to_string()))?;
        match tag {
            StateTag::MainMenu => Ok(Transition::MainMenu),
            StateTag::MagicMenu => Ok(self.magic_menu()),
            StateTag::ItemMenu => Ok(self.item_menu()),
            StateTag::Run => Ok(Transition::Run),
            StateTag::AllyTurn => Ok(Transition::AllyTurn),
            StateTag::EnemyTurn => Ok(Transition::EnemyTurn),
            StateTag::Victory => Ok(Transition::Victory),
            StateTag::Defeat => Ok(Transition::Defeat),
            StateTag::TargetSelection
            | StateTag::PlayerAttack
            | StateTag::PlayerMagicAttack
            | StateTag::PlayerItemAttack => Err(TransitionError::MissingParameters(tag)),
        }
    }

    /// Replaces the current state, then runs the entry action of each state
    /// entered until one of them waits for input.
    fn change_state(&mut self, request: Transition) {
        let mut pending = Some(request);
        while let Some(request) = pending.take() {
            let from = self.state.tag();
            match transition(from, request) {
                Ok(next) => {
                    tracing::debug!(%from, to = %next.tag(), "battle state change");
                    self.state = next;
                    pending = self.enter_state();
                }
                Err(err) => tracing::warn!(%err, "battle transition rejected"),
            }
        }
    }

    fn enter_state(&mut self) -> Option<Transition> {
        match self.state.clone() {
            BattleState::PlayerAttack { target } => Some(self.resolve_player_attack(target)),
            BattleState::PlayerMagicAttack { target, spell } => {
                Some(self.resolve_magic_attack(target, &spell))
            }
            BattleState::PlayerItemAttack { target, item } => {
                Some(self.resolve_item_attack(target, &item))
            }
            BattleState::Run => self.resolve_run(),
            BattleState::AllyTurn => self.resolve_ally_turn(),
            BattleState::EnemyTurn => Some(self.resolve_enemy_turn()),
            BattleState::Victory => {
                self.resolve_victory();
                None
            }
            BattleState::Defeat => {
                self.announce("You were defeated! Press Enter to restart.".to_string());
                None
            }
            BattleState::MainMenu { .. }
            | BattleState::TargetSelection { .. }
            | BattleState::MagicMenu { .. }
            | BattleState::ItemMenu { .. } => None,
        }
    }

    fn magic_menu(&self) -> Transition {
        Transition::MagicMenu {
            spells: self.player.known_spells.clone(),
        }
    }

    fn item_menu(&self) -> Transition {
        Transition::ItemMenu {
            entries: self.player.inventory.usable_groups(),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = match &self.state {
            BattleState::MainMenu { .. } => MAIN_MENU_OPTIONS.len(),
            BattleState::TargetSelection { .. } => self.enemies.len(),
            // Trailing "Back" entry.
            BattleState::MagicMenu { spells, .. } => spells.len() + 1,
            BattleState::ItemMenu { entries, .. } => entries.len() + 1,
            _ => return,
        };
        if len == 0 {
            return;
        }
        if let BattleState::MainMenu { selected }
        | BattleState::TargetSelection { selected, .. }
        | BattleState::MagicMenu { selected, .. }
        | BattleState::ItemMenu { selected, .. } = &mut self.state
        {
            *selected = (*selected as isize + delta).rem_euclid(len as isize) as usize;
            self.events.push(BattleEvent::Sound(Sound::Menu));
        }
    }

    fn cancel(&mut self) {
        if matches!(
            self.state.tag(),
            StateTag::TargetSelection | StateTag::MagicMenu | StateTag::ItemMenu
        ) {
            self.change_state(Transition::MainMenu);
        }
    }

    fn confirm(&mut self) {
        match self.state.clone() {
            BattleState::MainMenu { selected } => self.confirm_main_menu(selected),
            BattleState::TargetSelection { selected, action } => {
                self.confirm_target(selected, action)
            }
            BattleState::MagicMenu { spells, selected } => self.confirm_spell(&spells, selected),
            BattleState::ItemMenu { entries, selected } => self.confirm_item(&entries, selected),
            BattleState::AllyTurn => {
                self.message.clear();
                self.change_state(Transition::EnemyTurn);
            }
            BattleState::Victory => self.active = false,
            BattleState::Defeat => {
                self.active = false;
                self.events.push(BattleEvent::ReturnToTitle);
            }
            BattleState::PlayerAttack { .. }
            | BattleState::PlayerMagicAttack { .. }
            | BattleState::PlayerItemAttack { .. }
            | BattleState::Run
            | BattleState::EnemyTurn => {}
        }
    }

    fn confirm_main_menu(&mut self, selected: usize) {
        let Some(option) = MAIN_MENU_OPTIONS.get(selected).copied() else {
            return;
        };
        match option {
            MenuOption::Attack => {
                let request = if self.enemies.len() > 1 {
                    Transition::TargetSelection(TargetSelectionParams {
                        action: PendingAction::Attack,
                    })
                } else {
                    Transition::PlayerAttack(PlayerAttackParams { target: 0 })
                };
                self.change_state(request);
            }
            MenuOption::Magic => self.change_state(self.magic_menu()),
            MenuOption::Items => self.change_state(self.item_menu()),
            MenuOption::Run => self.change_state(Transition::Run),
        }
    }

    fn confirm_target(&mut self, selected: usize, action: PendingAction) {
        let target = selected;
        let request = match action {
            PendingAction::Attack => Transition::PlayerAttack(PlayerAttackParams { target }),
            PendingAction::Spell(spell) => {
                Transition::PlayerMagicAttack(MagicAttackParams { target, spell })
            }
            PendingAction::Item(item) => {
                Transition::PlayerItemAttack(ItemAttackParams { target, item })
            }
        };
        self.change_state(request);
    }

    /// Missing catalog ids and short MP are caught here, before anything
    /// is spent or any transition happens.
    fn confirm_spell(&mut self, spells: &[String], selected: usize) {
        let Some(id) = spells.get(selected) else {
            self.change_state(Transition::MainMenu);
            return;
        };
        let data = Arc::clone(&self.data);
        let Some(spell) = data.spells.get(id) else {
            tracing::warn!(spell = %id, "known spell missing from catalog");
            return;
        };
        if self.player.record().mp() < spell.cost {
            self.announce("Not enough MP!".to_string());
            return;
        }

        if !spell.kind.is_offensive() {
            self.message.clear();
            self.player.record_mut().spend_mp(spell.cost);
            self.cast_healing(spell);
            self.change_state(Transition::AllyTurn);
            return;
        }

        let request = if self.enemies.len() > 1 {
            Transition::TargetSelection(TargetSelectionParams {
                action: PendingAction::Spell(id.clone()),
            })
        } else {
            Transition::PlayerMagicAttack(MagicAttackParams {
                target: 0,
                spell: id.clone(),
            })
        };
        self.change_state(request);
    }

    fn confirm_item(&mut self, entries: &[ItemGroup], selected: usize) {
        let Some(group) = entries.get(selected) else {
            self.change_state(Transition::MainMenu);
            return;
        };
        let Some(kind) = self
            .player
            .inventory
            .peek_usable_by_name(&group.name)
            .map(|item| item.kind)
        else {
            tracing::warn!(item = %group.name, "item menu entry no longer in inventory");
            return;
        };

        if kind == ItemKind::Damage {
            let request = if self.enemies.len() > 1 {
                Transition::TargetSelection(TargetSelectionParams {
                    action: PendingAction::Item(group.name.clone()),
                })
            } else {
                Transition::PlayerItemAttack(ItemAttackParams {
                    target: 0,
                    item: group.name.clone(),
                })
            };
            self.change_state(request);
            return;
        }

        self.message.clear();
        if let Some(item) = self.player.inventory.take_usable_by_name(&group.name) {
            self.use_item_on_self(item);
        }
        self.change_state(Transition::AllyTurn);
    }
}
