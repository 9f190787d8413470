use crate::model::ActionKind;
use crate::pet::{Event, Pet};
use crate::schedule::Millis;
use log::info;

const FOCUS_TICK_MS: Millis = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FocusPhase {
    Idle,
    Focusing { time_left: u32 },
}

impl Pet {
    pub(crate) fn focus_phase(&self) -> FocusPhase {
        if self.state.is_focus_mode {
            FocusPhase::Focusing {
                time_left: self.state.time_left_secs,
            }
        } else {
            FocusPhase::Idle
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        match self.focus_phase() {
            FocusPhase::Idle => self.start_focus(),
            FocusPhase::Focusing { .. } => self.stop_focus(),
        }
    }

    pub(crate) fn start_focus(&mut self) {
        info!("focus session started ({}s)", self.focus_secs);
        self.state.is_focus_mode = true;
        self.state.time_left_secs = self.focus_secs;
        self.disarm_behavior();
        self.cancel_walk();
        self.set_action(ActionKind::Focus);
        self.speak(Some("Let's focus!"));
        self.sched.cancel_slot(&mut self.timers.focus);
        self.timers.focus = Some(self.sched.after(FOCUS_TICK_MS, Event::FocusTick));
    }

    /// Early cancel. Ignored when no session is running.
    pub(crate) fn stop_focus(&mut self) {
        if !self.state.is_focus_mode {
            return;
        }
        info!(
            "focus session stopped with {}s left",
            self.state.time_left_secs
        );
        self.leave_focus();
        self.set_action(ActionKind::Idle);
        self.speak(Some("Break time?"));
    }

    pub(crate) fn focus_tick(&mut self) {
        if !self.state.is_focus_mode {
            return;
        }
        self.state.time_left_secs = self.state.time_left_secs.saturating_sub(1);
        if self.state.time_left_secs == 0 {
            self.complete_focus();
            return;
        }
        self.set_action(ActionKind::Focus);
        self.timers.focus = Some(self.sched.after(FOCUS_TICK_MS, Event::FocusTick));
    }

    fn complete_focus(&mut self) {
        info!("focus session complete");
        self.leave_focus();
        self.speak(Some("Great job! Take a break!"));
        self.set_action(ActionKind::Happy);
        self.play();
    }

    fn leave_focus(&mut self) {
        self.state.is_focus_mode = false;
        self.sched.cancel_slot(&mut self.timers.focus);
        self.arm_behavior();
    }
}
