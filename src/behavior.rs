use crate::model::ActionKind;
use crate::pet::{Event, Pet};
use crate::schedule::Millis;
use log::debug;
use rand::Rng;

const TICK_MIN_MS: Millis = 3000;
const TICK_MAX_MS: Millis = 8000;
const CHATTER_ABOVE: f64 = 0.7;
const HUNGRY_BELOW: u8 = 20;
const IDLE_BELOW: f64 = 0.4;
const WALK_BELOW: f64 = 0.8;
pub(crate) const SLEEP_MS: Millis = 5000;

impl Pet {
    /// (Re)schedules the next autonomous decision with a fresh random delay.
    pub(crate) fn arm_behavior(&mut self) {
        self.sched.cancel_slot(&mut self.timers.behavior);
        if self.state.is_focus_mode {
            return;
        }
        let delay = self.rng.gen_range(TICK_MIN_MS..TICK_MAX_MS);
        self.timers.behavior = Some(self.sched.after(delay, Event::BehaviorTick));
    }

    pub(crate) fn disarm_behavior(&mut self) {
        self.sched.cancel_slot(&mut self.timers.behavior);
    }

    pub(crate) fn behavior_tick(&mut self) {
        if self.state.is_focus_mode {
            return;
        }
        if self.state.action.is_busy() {
            debug!("tick skipped while {:?}", self.state.action);
            self.arm_behavior();
            return;
        }

        if self.rng.gen::<f64>() > CHATTER_ABOVE {
            self.speak(None);
        }

        if self.state.hunger < HUNGRY_BELOW {
            self.speak(Some("I'm hungry!"));
            self.set_action(ActionKind::Idle);
        } else {
            let d: f64 = self.rng.gen();
            if d < IDLE_BELOW {
                self.set_action(ActionKind::Idle);
            } else if d < WALK_BELOW {
                self.walk_randomly();
            } else {
                self.set_action(ActionKind::Sleep);
                self.revert_after(SLEEP_MS, ActionKind::Idle);
            }
        }

        self.state.decay();
        debug!(
            "tick: action={:?} hunger={} mood={}",
            self.state.action, self.state.hunger, self.state.mood
        );
        self.arm_behavior();
    }
}
