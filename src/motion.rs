use crate::model::{ActionKind, Facing, Vec2};
use crate::pet::{Event, Pet, Walk};
use crate::schedule::Millis;
use log::debug;
use rand::Rng;

pub(crate) const WALK_MS: Millis = 2000;
pub(crate) const EDGE_MIN: f32 = 50.0;
pub(crate) const EDGE_MAX_INSET: f32 = 100.0;
const STEP_X: f32 = 100.0;
const STEP_Y: f32 = 50.0;

pub(crate) const BOUNCE_MS: Millis = 1500;
const BOUNCE_HEIGHT: f32 = 50.0;
const BOUNCE_HALF_PERIOD_MS: Millis = 300;

/// Edge length of the sprite's square box in world pixels.
pub(crate) const SPRITE_SIZE: f32 = 96.0;

/// Size of the area the pet may roam, in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Viewport {
    /// `[50, w-100] x [50, h-100]`, or None when the window is too small.
    pub(crate) fn roam_box(&self) -> Option<(Vec2, Vec2)> {
        let max = Vec2::new(self.width - EDGE_MAX_INSET, self.height - EDGE_MAX_INSET);
        if max.x < EDGE_MIN || max.y < EDGE_MIN {
            return None;
        }
        Some((Vec2::new(EDGE_MIN, EDGE_MIN), max))
    }

    /// Pulls a sprite origin back so the whole sprite box is on screen. A
    /// window smaller than the sprite pins it to the top-left corner.
    pub(crate) fn clamp_sprite(&self, p: Vec2) -> Vec2 {
        let max_x = (self.width - SPRITE_SIZE).max(0.0);
        let max_y = (self.height - SPRITE_SIZE).max(0.0);
        Vec2::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
    }
}

pub(crate) fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Tween {
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) start: Millis,
    pub(crate) duration: Millis,
}

impl Tween {
    pub(crate) fn sample(&self, now: Millis) -> Vec2 {
        if self.duration == 0 {
            return self.to;
        }
        let t = now.saturating_sub(self.start) as f32 / self.duration as f32;
        self.from.lerp(self.to, ease_in_out(t))
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct WalkPlan {
    pub(crate) target: Vec2,
    pub(crate) facing: Facing,
}

pub(crate) fn plan_walk(from: Vec2, viewport: Viewport, rng: &mut impl Rng) -> Option<WalkPlan> {
    let (lo, hi) = viewport.roam_box()?;
    let dx = rng.gen_range(-STEP_X..STEP_X);
    let dy = rng.gen_range(-STEP_Y..STEP_Y);
    Some(WalkPlan {
        target: Vec2::new(
            (from.x + dx).clamp(lo.x, hi.x),
            (from.y + dy).clamp(lo.y, hi.y),
        ),
        facing: Facing::from_dx(dx),
    })
}

/// Up-and-down hop, 0 at rest and -50 at the top.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bounce {
    pub(crate) start: Millis,
}

impl Bounce {
    pub(crate) fn offset(&self, now: Millis) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        if elapsed >= BOUNCE_MS {
            return 0.0;
        }
        let period = BOUNCE_HALF_PERIOD_MS * 2;
        let phase = elapsed % period;
        let up = if phase < BOUNCE_HALF_PERIOD_MS {
            phase as f32 / BOUNCE_HALF_PERIOD_MS as f32
        } else {
            (period - phase) as f32 / BOUNCE_HALF_PERIOD_MS as f32
        };
        -BOUNCE_HEIGHT * ease_in_out(up)
    }
}

impl Pet {
    /// Starts a random stroll. Returns false when there is nowhere to go.
    pub(crate) fn walk_randomly(&mut self) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        let now = self.now();
        let from = match &self.walk {
            Some(walk) => walk.tween.sample(now),
            None => self.state.position,
        };
        let Some(plan) = plan_walk(from, viewport, &mut self.rng) else {
            return false;
        };

        self.cancel_walk();
        self.set_action(ActionKind::Walk);
        self.state.direction = plan.facing;
        let timer = self.sched.after(WALK_MS, Event::WalkDone);
        self.walk = Some(Walk {
            tween: Tween {
                from,
                to: plan.target,
                start: now,
                duration: WALK_MS,
            },
            timer,
        });
        debug!(
            "walk ({:.0},{:.0}) -> ({:.0},{:.0})",
            from.x, from.y, plan.target.x, plan.target.y
        );
        true
    }

    pub(crate) fn finish_walk(&mut self) {
        if let Some(walk) = self.walk.take() {
            self.state.position = walk.tween.to;
            if self.state.action == ActionKind::Walk {
                self.state.action = ActionKind::Idle;
            }
        }
    }

    /// Applies a new window size and pulls the pet (and any stroll in
    /// flight) back inside it.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.state.position = viewport.clamp_sprite(self.state.position);
        if let Some(walk) = self.walk.as_mut() {
            walk.tween.from = viewport.clamp_sprite(walk.tween.from);
            walk.tween.to = viewport.clamp_sprite(walk.tween.to);
        }
    }

    /// Stops a stroll in place without committing the half-way position.
    pub(crate) fn cancel_walk(&mut self) {
        if let Some(walk) = self.walk.take() {
            self.sched.cancel(walk.timer);
            if self.state.action == ActionKind::Walk {
                self.state.action = ActionKind::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::tests::{pet_with_viewport, quiet_pet};
    use crate::pet::Command;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ease_curve_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
        assert_eq!(ease_in_out(2.0), 1.0);
    }

    #[test]
    fn walk_targets_stay_inside_roam_box() {
        let mut rng = StdRng::seed_from_u64(7);
        let vp = Viewport {
            width: 800.0,
            height: 600.0,
        };
        let (lo, hi) = vp.roam_box().expect("box");
        for i in 0..2000 {
            let from = Vec2::new(
                lo.x + (hi.x - lo.x) * ((i % 37) as f32 / 36.0),
                lo.y + (hi.y - lo.y) * ((i % 23) as f32 / 22.0),
            );
            let plan = plan_walk(from, vp, &mut rng).expect("plan");
            assert!(plan.target.x >= lo.x && plan.target.x <= hi.x);
            assert!(plan.target.y >= lo.y && plan.target.y <= hi.y);
            assert!((plan.target.x - from.x).abs() <= 100.0);
            assert!((plan.target.y - from.y).abs() <= 50.0);
        }
    }

    #[test]
    fn tiny_viewport_has_no_roam_box() {
        let vp = Viewport {
            width: 140.0,
            height: 600.0,
        };
        assert!(vp.roam_box().is_none());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(plan_walk(Vec2::default(), vp, &mut rng).is_none());
    }

    #[test]
    fn walk_without_viewport_does_nothing() {
        let mut pet = Pet::seeded(5);
        assert!(!pet.walk_randomly());
        assert_eq!(pet.state.action, ActionKind::Idle);
        assert!(pet.walk.is_none());
    }

    #[test]
    fn walk_commits_target_after_two_seconds() {
        let mut pet = pet_with_viewport(11);
        assert!(pet.walk_randomly());
        assert_eq!(pet.state.action, ActionKind::Walk);
        let start = pet.state.position;
        let target = pet.walk.as_ref().expect("walk").tween.to;

        pet.advance(1000);
        assert_eq!(pet.state.position, start);
        let mid = pet.render_position();
        assert!((mid.x - (start.x + target.x) / 2.0).abs() < 1e-3);

        pet.advance(1000);
        assert_eq!(pet.state.position, target);
        assert_eq!(pet.state.action, ActionKind::Idle);
        assert!(pet.walk.is_none());
        let dx = target.x - start.x;
        if dx < 0.0 {
            assert_eq!(pet.state.direction, Facing::Left);
        }
    }

    #[test]
    fn cancelled_walk_keeps_old_position() {
        let mut pet = quiet_pet(12);
        let start = pet.state.position;
        pet.walk_randomly();
        pet.advance(1500);
        pet.cancel_walk();
        pet.advance(5000);
        assert_eq!(pet.state.position, start);
        assert_ne!(pet.state.action, ActionKind::Walk);
    }

    #[test]
    fn bounce_rises_and_settles() {
        let b = Bounce { start: 100 };
        assert_eq!(b.offset(100), 0.0);
        assert!((b.offset(400) + 50.0).abs() < 1e-3);
        assert!(b.offset(250) < 0.0 && b.offset(250) > -50.0);
        assert!(b.offset(700).abs() < 1e-3);
        assert_eq!(b.offset(1600), 0.0);
    }

    #[test]
    fn small_window_pulls_spawn_back_on_screen() {
        // 80x24 cells
        let mut pet = Pet::seeded(13);
        assert_eq!(pet.state.position, Vec2::new(200.0, 300.0));
        pet.dispatch(Command::Resize {
            width: 480.0,
            height: 288.0,
        });
        assert_eq!(pet.state.position, Vec2::new(200.0, 192.0));
        assert!(pet.state.position.y + SPRITE_SIZE <= 288.0);
    }

    #[test]
    fn shrinking_window_clamps_walk_in_flight() {
        let mut pet = quiet_pet(14);
        pet.state.position = Vec2::new(700.0, 500.0);
        assert!(pet.walk_randomly());
        pet.dispatch(Command::Resize {
            width: 300.0,
            height: 200.0,
        });
        let target = pet.walk.as_ref().expect("walk").tween.to;
        assert!(target.x <= 204.0 && target.y <= 104.0);
        pet.advance(WALK_MS);
        let p = pet.state.position;
        assert!(p.x + SPRITE_SIZE <= 300.0 && p.y + SPRITE_SIZE <= 200.0);
    }

    #[test]
    fn tiny_window_pins_sprite_to_corner() {
        let vp = Viewport {
            width: 40.0,
            height: 60.0,
        };
        assert_eq!(vp.clamp_sprite(Vec2::new(200.0, -10.0)), Vec2::new(0.0, 0.0));
    }
}
