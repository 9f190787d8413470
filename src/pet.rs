use crate::model::{ActionKind, PetState, Vec2};
use crate::motion::{Bounce, Tween, Viewport};
use crate::schedule::{Millis, Scheduler, TimerId};
use log::debug;
use rand::rngs::StdRng;

/// Timer payloads. Each one is handled by the component that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    BehaviorTick,
    FocusTick,
    Revert(ActionKind),
    ClearMessage,
    WalkDone,
    BounceDone,
}

/// Everything the outside world can ask of the pet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    Feed,
    Play,
    CycleSkin,
    ToggleFocus,
    DragStart,
    DragEnd { dx: f32, dy: f32 },
    Resize { width: f32, height: f32 },
}

#[derive(Default)]
pub(crate) struct Timers {
    pub(crate) behavior: Option<TimerId>,
    pub(crate) focus: Option<TimerId>,
    pub(crate) message: Option<TimerId>,
    pub(crate) reverts: Vec<TimerId>,
}

pub(crate) struct Walk {
    pub(crate) tween: Tween,
    pub(crate) timer: TimerId,
}

/// The pet engine: owns the state, the clock, and the random source, and is
/// the only place state changes happen.
pub(crate) struct Pet {
    pub(crate) state: PetState,
    pub(crate) sched: Scheduler<Event>,
    pub(crate) rng: StdRng,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) focus_secs: u32,
    pub(crate) timers: Timers,
    pub(crate) walk: Option<Walk>,
    pub(crate) bounce: Option<Bounce>,
}

impl Pet {
    pub(crate) fn new(rng: StdRng, focus_secs: u32) -> Self {
        let mut pet = Self {
            state: PetState::default(),
            sched: Scheduler::new(),
            rng,
            viewport: None,
            focus_secs: focus_secs.max(1),
            timers: Timers::default(),
            walk: None,
            bounce: None,
        };
        pet.arm_behavior();
        pet
    }

    #[cfg(test)]
    pub(crate) fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self::new(StdRng::seed_from_u64(seed), crate::model::DEFAULT_FOCUS_SECS)
    }

    pub(crate) fn now(&self) -> Millis {
        self.sched.now()
    }

    pub(crate) fn dispatch(&mut self, cmd: Command) {
        debug!("command {:?} at {}ms", cmd, self.now());
        match cmd {
            Command::Feed => self.feed(),
            Command::Play => self.play(),
            Command::CycleSkin => self.cycle_skin(),
            Command::ToggleFocus => self.toggle_focus(),
            Command::DragStart => self.drag_start(),
            Command::DragEnd { dx, dy } => self.drag_end(dx, dy),
            Command::Resize { width, height } => self.resize(Viewport { width, height }),
        }
    }

    /// Runs simulated time forward, firing every timer that comes due.
    pub(crate) fn advance(&mut self, dt: Millis) {
        let until = self.now().saturating_add(dt);
        while let Some(event) = self.sched.pop_due(until) {
            self.handle(event);
        }
        self.sched.settle(until);
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::BehaviorTick => {
                self.timers.behavior = None;
                self.behavior_tick();
            }
            Event::FocusTick => {
                self.timers.focus = None;
                self.focus_tick();
            }
            Event::Revert(action) => {
                self.forget_fired_reverts();
                self.state.action = action;
                debug!("revert -> {:?}", action);
            }
            Event::ClearMessage => {
                self.timers.message = None;
                self.state.message.clear();
            }
            Event::WalkDone => self.finish_walk(),
            Event::BounceDone => {
                self.forget_fired_reverts();
                self.bounce = None;
                self.state.action = ActionKind::Idle;
            }
        }
    }

    fn forget_fired_reverts(&mut self) {
        let sched = &self.sched;
        self.timers.reverts.retain(|id| sched.is_pending(*id));
    }

    /// Moves to `action`, dropping any revert still queued from an earlier
    /// transition.
    pub(crate) fn set_action(&mut self, action: ActionKind) {
        for id in self.timers.reverts.drain(..) {
            self.sched.cancel(id);
        }
        self.bounce = None;
        if self.state.action != action {
            debug!("action {:?} -> {:?}", self.state.action, action);
        }
        self.state.action = action;
    }

    pub(crate) fn revert_after(&mut self, delay: Millis, action: ActionKind) {
        let id = self.sched.after(delay, Event::Revert(action));
        self.timers.reverts.push(id);
    }

    /// Where the sprite should be drawn right now, including any tween in
    /// flight. Drag offsets are layered on by the caller.
    pub(crate) fn render_position(&self) -> Vec2 {
        let now = self.now();
        let base = match &self.walk {
            Some(walk) => walk.tween.sample(now),
            None => self.state.position,
        };
        match &self.bounce {
            Some(b) => Vec2::new(base.x, base.y + b.offset(now)),
            None => base,
        }
    }

    /// Cancels every pending timer and drops any tween without committing it.
    pub(crate) fn shutdown(&mut self) {
        self.sched.clear();
        self.timers = Timers::default();
        self.walk = None;
        self.bounce = None;
    }
}
