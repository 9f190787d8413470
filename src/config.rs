use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::DEFAULT_FOCUS_SECS;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pixelpal")]
#[command(about = "A tiny pixel cat that wanders your terminal and keeps you focused", long_about = None)]
pub(crate) struct Args {
    /// Random seed (0 = fresh entropy every run)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// FPS cap (render rate). The pet simulation runs at a fixed step.
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Length of a focus session in minutes
    #[arg(long)]
    pub(crate) focus_minutes: Option<u32>,

    /// Draw everything in plain white
    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,

    /// Where to write the log (defaults to the data dir)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) seed: u64,
    pub(crate) focus_secs: u32,
    pub(crate) start_skin: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            seed: 0,
            focus_secs: DEFAULT_FOCUS_SECS,
            start_skin: 0,
        }
    }
}

impl Settings {
    /// Command-line flags win over the settings file.
    pub(crate) fn merge_args(mut self, args: &Args) -> Self {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if let Some(min) = args.focus_minutes {
            self.focus_secs = min.saturating_mul(60);
        }
        if args.no_color {
            self.enable_color = false;
        }
        self.fps_cap = self.fps_cap.clamp(10, 240);
        self.focus_secs = self.focus_secs.max(1);
        self
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "pixelpal", "PixelPal")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("pixelpal.log"),
    })
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
        log::warn!("ignoring malformed settings at {}", path.display());
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    if path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
