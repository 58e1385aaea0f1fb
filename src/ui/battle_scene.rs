use crate::battle::{Battle, BattleState, MAIN_MENU_OPTIONS};
use crate::catalog::GameData;
use crate::character::ItemGroup;
use crate::combat::{CombatRecord, Enemy};
use crate::ui::combat_effects::EffectAnchor;
use rand::Rng;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Screen regions the effect anchors resolve against.
struct SceneLayout {
    hero: Rect,
    enemy_cells: Vec<Rect>,
}

impl SceneLayout {
    fn anchor(&self, anchor: EffectAnchor) -> Option<(u16, u16)> {
        let rect = match anchor {
            EffectAnchor::Player => self.hero,
            EffectAnchor::Enemy(slot) => *self.enemy_cells.get(slot)?,
        };
        Some((rect.x + rect.width / 2, rect.y + rect.height / 2))
    }
}

/// Draws the whole battle window, then the effect queue on top.
pub fn draw_battle<R: Rng>(frame: &mut Frame, area: Rect, battle: &Battle<R>) {
    let outer = Block::default().borders(Borders::ALL).title("Battle");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Message box
            Constraint::Min(6),    // Field
            Constraint::Length(7), // Menu
        ])
        .split(inner);

    draw_message(frame, chunks[0], battle.message());

    let field = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(10)])
        .split(chunks[1]);

    draw_hero_panel(frame, field[0], battle);
    let enemy_cells = draw_enemy_row(frame, field[1], battle);
    draw_menu(frame, chunks[2], battle);

    let layout = SceneLayout {
        hero: field[0],
        enemy_cells,
    };
    battle
        .effects()
        .draw(frame.buffer_mut(), area, |anchor| layout.anchor(anchor));
}

fn hp_color(ratio: f64) -> Color {
    if ratio > 0.66 {
        Color::Green
    } else if ratio > 0.33 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str) {
    let lines: Vec<Line> = message.lines().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn status_line(record: &CombatRecord) -> Line<'static> {
    if record.status_effects.is_empty() {
        return Line::from("");
    }
    let spans: Vec<Span> = record
        .status_effects
        .iter()
        .map(|(name, turns)| {
            Span::styled(
                format!("{name}({turns}) "),
                Style::default().fg(Color::Magenta),
            )
        })
        .collect();
    Line::from(spans)
}

fn draw_hero_panel<R: Rng>(frame: &mut Frame, area: Rect, battle: &Battle<R>) {
    let player = battle.player();
    let record = player.record();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} Lv {}", player.name(), player.level));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HP
            Constraint::Length(1), // MP
            Constraint::Length(1), // Statuses
            Constraint::Min(0),    // Allies
        ])
        .split(inner);

    let hp_ratio = record.hp_ratio().clamp(0.0, 1.0);
    let hp = Gauge::default()
        .gauge_style(Style::default().fg(hp_color(hp_ratio)).add_modifier(Modifier::BOLD))
        .label(format!("HP {}/{}", record.hp(), record.max_hp()))
        .ratio(hp_ratio);
    frame.render_widget(hp, rows[0]);

    let mp_ratio = if record.max_mp() == 0 {
        0.0
    } else {
        (record.mp() as f64 / record.max_mp() as f64).clamp(0.0, 1.0)
    };
    let mp = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        .label(format!("MP {}/{}", record.mp(), record.max_mp()))
        .ratio(mp_ratio);
    frame.render_widget(mp, rows[1]);

    frame.render_widget(Paragraph::new(status_line(record)), rows[2]);

    let allies: Vec<Line> = battle
        .allies()
        .iter()
        .map(|ally| {
            Line::from(Span::styled(
                format!("+ {}", ally.name),
                Style::default().fg(Color::Cyan),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(allies), rows[3]);
}

/// Draws one cell per enemy and returns the cells, in slot order.
fn draw_enemy_row<R: Rng>(frame: &mut Frame, area: Rect, battle: &Battle<R>) -> Vec<Rect> {
    let enemies = battle.enemies();
    if enemies.is_empty() {
        return Vec::new();
    }
    let targeted = match battle.state() {
        BattleState::TargetSelection { selected, .. } => Some(*selected),
        _ => None,
    };

    let constraints: Vec<Constraint> = enemies
        .iter()
        .map(|_| Constraint::Ratio(1, enemies.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (index, (enemy, cell)) in enemies.iter().zip(cells.iter()).enumerate() {
        draw_enemy(frame, *cell, enemy, targeted == Some(index));
    }
    cells.to_vec()
}

fn draw_enemy(frame: &mut Frame, area: Rect, enemy: &Enemy, targeted: bool) {
    let border_style = if targeted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(enemy.name().to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let record = enemy.record();
    let ratio = record.hp_ratio().clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Red))
        .label(format!("{}/{}", record.hp(), record.max_hp()))
        .ratio(ratio);
    frame.render_widget(gauge, rows[0]);
    frame.render_widget(Paragraph::new(status_line(record)), rows[1]);
}

fn menu_line(label: String, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("> {label}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("  {label}"))
    }
}

fn spell_lines(data: &GameData, spells: &[String], selected: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = spells
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let label = match data.spells.get(id) {
                Some(spell) => format!("{} ({} MP)", spell.name, spell.cost),
                None => "???".to_string(),
            };
            menu_line(label, index == selected)
        })
        .collect();
    lines.push(menu_line("Back".to_string(), selected == spells.len()));
    lines
}

fn item_lines(entries: &[ItemGroup], selected: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(index, group)| menu_line(format!("{} x{}", group.name, group.count), index == selected))
        .collect();
    lines.push(menu_line("Back".to_string(), selected == entries.len()));
    lines
}

fn draw_menu<R: Rng>(frame: &mut Frame, area: Rect, battle: &Battle<R>) {
    let (title, lines): (&str, Vec<Line>) = match battle.state() {
        BattleState::MainMenu { selected } => (
            "Command",
            MAIN_MENU_OPTIONS
                .iter()
                .enumerate()
                .map(|(index, option)| menu_line(option.label().to_string(), index == *selected))
                .collect(),
        ),
        BattleState::TargetSelection { selected, .. } => (
            "Target",
            battle
                .enemies()
                .iter()
                .enumerate()
                .map(|(index, enemy)| menu_line(enemy.name().to_string(), index == *selected))
                .collect(),
        ),
        BattleState::MagicMenu { spells, selected } => {
            ("Magic", spell_lines(battle.data(), spells, *selected))
        }
        BattleState::ItemMenu { entries, selected } => ("Items", item_lines(entries, *selected)),
        BattleState::AllyTurn | BattleState::Victory | BattleState::Defeat => (
            "",
            vec![Line::from(Span::styled(
                "Press Enter to continue",
                Style::default().add_modifier(Modifier::ITALIC),
            ))],
        ),
        _ => ("", Vec::new()),
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleInput;
    use crate::character::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    fn create_test_battle() -> Battle<ChaCha8Rng> {
        let data = Arc::new(GameData::embedded().unwrap());
        let player = Player::hero(&data);
        let enemies = vec![
            data.bestiary.create_enemy("slime").unwrap(),
            data.bestiary.create_enemy("bat").unwrap(),
        ];
        Battle::with_rng(data, player, enemies, Vec::new(), ChaCha8Rng::seed_from_u64(12345))
    }

    #[test]
    fn test_renders_message_hero_and_enemies() {
        let battle = create_test_battle();
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| battle.draw(frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("A wild Slime, Bat appeared!"));
        assert!(text.contains("Hero Lv 1"));
        assert!(text.contains("HP 50/50"));
        assert!(text.contains("Slime"));
        assert!(text.contains("> Attack"));
    }

    #[test]
    fn test_magic_menu_shows_costs_and_back() {
        let mut battle = create_test_battle();
        battle.handle_input(BattleInput::Down);
        battle.handle_input(BattleInput::Confirm);
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| battle.draw(frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("> Heal (5 MP)"));
        assert!(text.contains("Fireball (8 MP)"));
        assert!(text.contains("Back"));
    }

    #[test]
    fn test_unknown_spell_renders_as_question_marks() {
        let data = GameData::embedded().unwrap();
        let lines = spell_lines(&data, &["forbidden".to_string()], 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Line::from("  ???"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let battle = create_test_battle();
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal.draw(|frame| battle.draw(frame)).unwrap();
    }
}
