use crate::constants::{DAMAGE_NUMBER_GRAVITY, DAMAGE_NUMBER_RISE_SPEED, DAMAGE_NUMBER_SECONDS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

/// Where a floating number is attached on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectAnchor {
    Player,
    /// Enemy slot at the time the effect was created.
    Enemy(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectType {
    /// Full-viewport tint.
    Flash { color: Color },
    DamageNumber {
        value: u32,
        anchor: EffectAnchor,
        /// Horizontal scatter in columns.
        offset_x: i32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualEffect {
    pub effect_type: EffectType,
    pub lifetime: f64,
    pub max_lifetime: f64,
}

impl VisualEffect {
    pub fn new(effect_type: EffectType, max_lifetime: f64) -> Self {
        Self {
            effect_type,
            lifetime: 0.0,
            max_lifetime,
        }
    }

    pub fn flash(color: Color, duration: f64) -> Self {
        Self::new(EffectType::Flash { color }, duration)
    }

    pub fn damage_number(value: u32, anchor: EffectAnchor, offset_x: i32, color: Color) -> Self {
        Self::new(
            EffectType::DamageNumber {
                value,
                anchor,
                offset_x,
                color,
            },
            DAMAGE_NUMBER_SECONDS,
        )
    }

    /// Advances the timer. Returns false once the effect has run out.
    pub fn update(&mut self, delta: f64) -> bool {
        self.lifetime += delta;
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.lifetime < self.max_lifetime
    }

    /// Rows above the anchor: rises, then falls back under gravity.
    pub fn rise(&self) -> f64 {
        let t = self.lifetime;
        DAMAGE_NUMBER_RISE_SPEED * t - 0.5 * DAMAGE_NUMBER_GRAVITY * t * t
    }

    /// Draws into `buf`, clipped to `area`. `anchor_at` maps an anchor to the
    /// cell the number starts from; unresolved anchors draw nothing.
    pub fn render(
        &self,
        buf: &mut Buffer,
        area: Rect,
        anchor_at: &impl Fn(EffectAnchor) -> Option<(u16, u16)>,
    ) {
        if !self.is_active() {
            return;
        }
        match &self.effect_type {
            EffectType::Flash { color } => {
                for y in area.top()..area.bottom() {
                    for x in area.left()..area.right() {
                        buf.get_mut(x, y).set_bg(*color);
                    }
                }
            }
            EffectType::DamageNumber {
                value,
                anchor,
                offset_x,
                color,
            } => {
                let Some((ax, ay)) = anchor_at(*anchor) else {
                    return;
                };
                let text = value.to_string();
                let x = ax as i32 + offset_x;
                let y = ay as i32 - self.rise().round() as i32;
                let width = text.len() as i32;
                if x < area.left() as i32
                    || x + width > area.right() as i32
                    || y < area.top() as i32
                    || y >= area.bottom() as i32
                {
                    return;
                }
                buf.set_string(
                    x as u16,
                    y as u16,
                    text,
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                );
            }
        }
    }
}

/// Transient effects owned by one battle, drawn in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    effects: Vec<VisualEffect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, effect: VisualEffect) {
        self.effects.push(effect);
    }

    /// Ages every effect by `dt` seconds and drops the finished ones.
    pub fn advance(&mut self, dt: f64) {
        self.effects.retain_mut(|effect| effect.update(dt));
    }

    pub fn draw(
        &self,
        buf: &mut Buffer,
        area: Rect,
        anchor_at: impl Fn(EffectAnchor) -> Option<(u16, u16)>,
    ) {
        for effect in &self.effects {
            effect.render(buf, area, &anchor_at);
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_center(_: EffectAnchor) -> Option<(u16, u16)> {
        Some((5, 5))
    }

    #[test]
    fn test_effect_creation() {
        let effect = VisualEffect::damage_number(50, EffectAnchor::Player, 0, Color::White);
        assert!(effect.is_active());
        assert_eq!(effect.lifetime, 0.0);
        assert_eq!(effect.max_lifetime, 0.8);
    }

    #[test]
    fn test_effect_update() {
        let mut effect = VisualEffect::flash(Color::White, 0.2);
        assert!(effect.update(0.1));
        assert!(!effect.update(0.15));
        assert!(!effect.is_active());
    }

    #[test]
    fn test_damage_number_rises_then_falls() {
        let mut effect = VisualEffect::damage_number(7, EffectAnchor::Enemy(0), 0, Color::White);
        effect.update(0.5);
        let peak = effect.rise();
        effect.update(0.25);
        assert!(peak > 0.0);
        assert!(effect.rise() < peak);
    }

    #[test]
    fn test_queue_prunes_finished_effects() {
        let mut queue = EffectQueue::new();
        queue.add(VisualEffect::flash(Color::White, 0.1));
        queue.add(VisualEffect::damage_number(3, EffectAnchor::Player, 0, Color::Red));
        queue.advance(0.2);
        assert_eq!(queue.len(), 1);
        queue.advance(1.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_flash_tints_whole_area() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let mut queue = EffectQueue::new();
        queue.add(VisualEffect::flash(Color::Blue, 0.2));
        queue.draw(&mut buf, area, at_center);
        assert_eq!(buf.get(0, 0).bg, Color::Blue);
        assert_eq!(buf.get(3, 1).bg, Color::Blue);
    }

    #[test]
    fn test_later_effects_draw_over_earlier() {
        let area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(area);
        let mut queue = EffectQueue::new();
        queue.add(VisualEffect::damage_number(1, EffectAnchor::Player, 0, Color::Red));
        queue.add(VisualEffect::damage_number(2, EffectAnchor::Player, 0, Color::Green));
        queue.draw(&mut buf, area, at_center);
        assert_eq!(buf.get(5, 5).symbol(), "2");
        assert_eq!(buf.get(5, 5).fg, Color::Green);
    }

    #[test]
    fn test_unresolved_anchor_draws_nothing() {
        let area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(area);
        let effect = VisualEffect::damage_number(9, EffectAnchor::Enemy(4), 0, Color::Red);
        effect.render(&mut buf, area, &|_| None);
        assert_eq!(buf, Buffer::empty(area));
    }
}
