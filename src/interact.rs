use crate::model::{ActionKind, FeedOutcome, Vec2, SKINS};
use crate::motion::{Bounce, BOUNCE_MS};
use crate::pet::{Event, Pet};
use crate::schedule::Millis;

const EAT_MS: Millis = 2000;
const FED_HAPPY_MS: Millis = 4000;
const SKIN_HAPPY_MS: Millis = 1000;

impl Pet {
    pub(crate) fn feed(&mut self) {
        if self.state.feed_boost() == FeedOutcome::Full {
            self.speak(Some("I'm full!"));
            return;
        }
        self.set_action(ActionKind::Eat);
        self.speak(Some("Yummy!"));
        self.revert_after(EAT_MS, ActionKind::Happy);
        self.revert_after(FED_HAPPY_MS, ActionKind::Idle);
    }

    pub(crate) fn play(&mut self) {
        self.state.play_boost();
        self.set_action(ActionKind::Happy);
        self.speak(Some("Yay!"));
        self.bounce = Some(Bounce { start: self.now() });
        let id = self.sched.after(BOUNCE_MS, Event::BounceDone);
        self.timers.reverts.push(id);
    }

    pub(crate) fn cycle_skin(&mut self) {
        self.state.skin_index = (self.state.skin_index + 1) % SKINS.len();
        let name = self.state.skin().name;
        let announcement = format!("I'm {name}!");
        self.speak(Some(announcement.as_str()));
        self.set_action(ActionKind::Happy);
        self.revert_after(SKIN_HAPPY_MS, ActionKind::Idle);
    }

    pub(crate) fn drag_start(&mut self) {
        if self.state.is_focus_mode {
            return;
        }
        self.cancel_walk();
        self.set_action(ActionKind::Happy);
    }

    pub(crate) fn drag_end(&mut self, dx: f32, dy: f32) {
        if self.state.is_focus_mode {
            return;
        }
        self.cancel_walk();
        self.state.position = self.drop_point(self.state.position, dx, dy);
        self.set_action(ActionKind::Idle);
        self.speak(Some("Whoa!"));
    }

    /// Where a drag by (dx,dy) from `from` lets go, kept inside the window.
    pub(crate) fn drop_point(&self, from: Vec2, dx: f32, dy: f32) -> Vec2 {
        let p = from.add(Vec2::new(dx, dy));
        match self.viewport {
            Some(vp) => vp.clamp_sprite(p),
            None => p,
        }
    }
}
