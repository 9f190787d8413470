use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Settings};
use crate::input::{collect_input_nonblocking, map_key, DragTracker, InputEvent, UserAction};
use crate::pet::{Command, Pet};
use crate::render::{draw_scene, sprite_hit, Terminal};
use anyhow::Context;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};

/// Simulation step; timers resolve at this granularity.
const SIM_STEP_MS: u64 = 20;

pub(crate) struct App {
    settings: Settings,
    pet: Pet,
    term: Terminal,
    drag: DragTracker,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let rng = if settings.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(settings.seed)
        };
        let mut pet = Pet::new(rng, settings.focus_secs);
        pet.state.skin_index = settings.start_skin % crate::model::SKINS.len();

        let term = Terminal::begin().context("could not set up the terminal")?;
        let (width, height) = term.world_size();
        pet.dispatch(Command::Resize { width, height });

        Ok(Self {
            settings,
            pet,
            term,
            drag: DragTracker::default(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps_cap as f32);
        let sim_step = Duration::from_millis(SIM_STEP_MS);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            if self.term.resize_if_needed()? {
                let (width, height) = self.term.world_size();
                self.pet.dispatch(Command::Resize { width, height });
            }

            for ev in collect_input_nonblocking(frame_dt)? {
                self.handle_input(ev);
                if self.should_quit {
                    break;
                }
            }

            // sim fixed-step
            let now = Instant::now();
            sim_accum = sim_accum.saturating_add(now.saturating_duration_since(last_frame));
            last_frame = now;
            while sim_accum >= sim_step {
                self.pet.advance(SIM_STEP_MS);
                sim_accum = sim_accum.saturating_sub(sim_step);
            }

            draw_scene(&mut self.term, &self.pet, self.drag.offset_px(), &self.settings);
            self.term.present()?;

            spin_sleep(frame_dt, Instant::now());
        }

        debug!("shutting down with {} timers pending", self.pet.sched.pending());
        self.pet.shutdown();
        if let Ok(snapshot) = serde_json::to_string(&self.pet.state) {
            debug!("final state {snapshot}");
        }
        self.term.end()?;
        Ok(())
    }

    fn handle_input(&mut self, ev: InputEvent) {
        let cmd = match ev {
            InputEvent::Key { key, mods } => {
                match map_key(self.pet.state.is_focus_mode, key, mods) {
                    Some(UserAction::Quit) => {
                        self.should_quit = true;
                        None
                    }
                    Some(UserAction::Pet(cmd)) => Some(cmd),
                    None => None,
                }
            }
            InputEvent::MouseDown { col, row } => {
                let on_pet = !self.pet.state.is_focus_mode
                    && sprite_hit(self.pet.render_position(), col, row);
                self.drag.press(col, row, on_pet)
            }
            InputEvent::MouseDrag { col, row } => {
                self.drag.moved(col, row);
                None
            }
            InputEvent::MouseUp { col, row } => self.drag.release(col, row),
        };
        if let Some(cmd) = cmd {
            self.pet.dispatch(cmd);
            if self.pet.state.is_focus_mode {
                self.drag.cancel();
            }
        }
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let paths = project_paths()?;
    let log_path = args.log_file.clone().unwrap_or_else(|| paths.log_path.clone());
    crate::init_logging(&log_path)?;

    if !paths.settings_path.exists() {
        save_settings_atomic(&paths.settings_path, &Settings::default())?;
    }
    let settings = load_settings(&paths.settings_path).merge_args(&args);
    info!(
        "starting: fps={} focus={}s seed={} color={}",
        settings.fps_cap, settings.focus_secs, settings.seed, settings.enable_color
    );

    let mut app = App::init(settings)?;
    let result = app.run();
    if result.is_err() {
        // leave the terminal usable even when the loop bailed
        let _ = app.term.end();
    }
    info!("bye");
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
