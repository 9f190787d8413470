use serde::{Deserialize, Serialize};

pub(crate) const ATTR_MAX: u8 = 100;
pub(crate) const FULL_THRESHOLD: u8 = 90;
pub(crate) const FEED_AMOUNT: u8 = 30;
pub(crate) const PLAY_AMOUNT: u8 = 20;
pub(crate) const HUNGER_DECAY: u8 = 2;
pub(crate) const MOOD_DECAY: u8 = 1;

pub(crate) const DEFAULT_FOCUS_SECS: u32 = 25 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ActionKind {
    Idle,
    Walk,
    Sleep,
    Happy,
    Eat,
    Focus,
}

impl ActionKind {
    /// Actions during which the behavior loop leaves the pet alone.
    pub(crate) fn is_busy(self) -> bool {
        matches!(self, ActionKind::Sleep | ActionKind::Eat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Facing {
    Left,
    Right,
}

impl Facing {
    pub(crate) fn from_dx(dx: f32) -> Self {
        if dx < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn add(self, o: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + o.x,
            y: self.y + o.y,
        }
    }

    pub(crate) fn lerp(self, o: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (o.x - self.x) * t,
            y: self.y + (o.y - self.y) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Skin {
    pub(crate) name: &'static str,
    pub(crate) color_hex: &'static str,
}

impl Skin {
    /// Parses `#rgb` or `#rrggbb`.
    pub(crate) fn rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(self.color_hex)
    }
}

pub(crate) const SKINS: [Skin; 5] = [
    Skin {
        name: "Void",
        color_hex: "#333",
    },
    Skin {
        name: "Orange",
        color_hex: "#f97316",
    },
    Skin {
        name: "Ghost",
        color_hex: "#cbd5e1",
    },
    Skin {
        name: "Pinky",
        color_hex: "#f472b6",
    },
    Skin {
        name: "Blue",
        color_hex: "#3b82f6",
    },
];

pub(crate) const QUOTES: [&str; 9] = [
    "Have you hydrated today?",
    "It works on my machine.",
    "Git push --force?",
    "I need coffee",
    "Checking for bugs...",
    "Pixel perfect!",
    "Don't forget to commit.",
    "Refactoring life...",
    "Dark mode is better.",
];

pub(crate) fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    match hex.len() {
        3 => {
            let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeedOutcome {
    Fed,
    Full,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct PetState {
    pub(crate) position: Vec2,
    pub(crate) action: ActionKind,
    pub(crate) direction: Facing,
    pub(crate) hunger: u8,
    pub(crate) mood: u8,
    pub(crate) message: String,
    pub(crate) skin_index: usize,
    pub(crate) is_focus_mode: bool,
    pub(crate) time_left_secs: u32,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            position: Vec2::new(200.0, 300.0),
            action: ActionKind::Idle,
            direction: Facing::Right,
            hunger: 50,
            mood: 80,
            message: String::new(),
            skin_index: 0,
            is_focus_mode: false,
            time_left_secs: DEFAULT_FOCUS_SECS,
        }
    }
}

impl PetState {
    pub(crate) fn skin(&self) -> Skin {
        SKINS[self.skin_index % SKINS.len()]
    }

    pub(crate) fn decay(&mut self) {
        self.hunger = self.hunger.saturating_sub(HUNGER_DECAY);
        self.mood = self.mood.saturating_sub(MOOD_DECAY);
    }

    pub(crate) fn feed_boost(&mut self) -> FeedOutcome {
        if self.hunger >= FULL_THRESHOLD {
            return FeedOutcome::Full;
        }
        self.hunger = self.hunger.saturating_add(FEED_AMOUNT).min(ATTR_MAX);
        FeedOutcome::Fed
    }

    pub(crate) fn play_boost(&mut self) {
        self.mood = self.mood.saturating_add(PLAY_AMOUNT).min(ATTR_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_pet() {
        let st = PetState::default();
        assert_eq!(st.position, Vec2::new(200.0, 300.0));
        assert_eq!(st.action, ActionKind::Idle);
        assert_eq!((st.hunger, st.mood), (50, 80));
        assert_eq!(st.skin_index, 0);
        assert!(!st.is_focus_mode);
        assert_eq!(st.time_left_secs, 1500);
        assert!(st.message.is_empty());
    }

    #[test]
    fn decay_floors_at_zero() {
        let mut st = PetState {
            hunger: 1,
            mood: 0,
            ..PetState::default()
        };
        st.decay();
        assert_eq!((st.hunger, st.mood), (0, 0));

        let mut st = PetState::default();
        st.decay();
        assert_eq!((st.hunger, st.mood), (48, 79));
    }

    #[test]
    fn feed_boost_caps_and_refuses_when_full() {
        let mut st = PetState {
            hunger: 85,
            ..PetState::default()
        };
        assert_eq!(st.feed_boost(), FeedOutcome::Fed);
        assert_eq!(st.hunger, 100);
        assert_eq!(st.feed_boost(), FeedOutcome::Full);
        assert_eq!(st.hunger, 100);

        let mut st = PetState {
            hunger: 90,
            ..PetState::default()
        };
        assert_eq!(st.feed_boost(), FeedOutcome::Full);
        assert_eq!(st.hunger, 90);
    }

    #[test]
    fn play_boost_caps_at_max() {
        let mut st = PetState::default();
        for _ in 0..10 {
            st.play_boost();
            assert!(st.mood <= ATTR_MAX);
        }
        assert_eq!(st.mood, 100);
    }

    #[test]
    fn hex_colors_parse_short_and_long_forms() {
        assert_eq!(parse_hex_color("#333"), Some((0x33, 0x33, 0x33)));
        assert_eq!(parse_hex_color("#f97316"), Some((0xf9, 0x73, 0x16)));
        assert_eq!(parse_hex_color("333"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzz"), None);
        assert!(SKINS.iter().all(|s| s.rgb().is_some()));
    }

    #[test]
    fn facing_follows_horizontal_delta() {
        assert_eq!(Facing::from_dx(-0.1), Facing::Left);
        assert_eq!(Facing::from_dx(0.0), Facing::Right);
    }
}
