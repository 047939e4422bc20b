/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Only host concerns live here (frame cadence, cell geometry) plus an
/// optional fixed countdown deadline. Particle and countdown constants are
/// compiled in.

use serde::Deserialize;
use std::path::PathBuf;

use chrono::DateTime;

use crate::sim::world::DeadlineSource;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct PageConfig {
    pub render: RenderConfig,
    pub deadline: DeadlineSource,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub frame_ms: u64,
    pub cell_width_px: f32,   // surface px per terminal column
    pub cell_height_px: f32,  // surface px per terminal row
}

impl RenderConfig {
    pub fn cell_px(&self) -> (f32, f32) {
        (self.cell_width_px, self.cell_height_px)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    render: TomlRender,
    #[serde(default)]
    countdown: TomlCountdown,
}

#[derive(Deserialize, Debug)]
struct TomlRender {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_cell_width")]
    cell_width_px: f32,
    #[serde(default = "default_cell_height")]
    cell_height_px: f32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlCountdown {
    /// RFC 3339 timestamp. Absent = fresh 24h window per launch.
    #[serde(default)]
    deadline: Option<String>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }        // ~60 fps, one particle step per frame
fn default_cell_width() -> f32 { 8.0 }
fn default_cell_height() -> f32 { 16.0 }

impl Default for TomlRender {
    fn default() -> Self {
        TomlRender {
            frame_ms: default_frame_ms(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
        }
    }
}

// ── Loading ──

impl PageConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        match read_config_text(&candidate_dirs()) {
            Some(text) => Self::from_toml_str(&text),
            None => Self::resolve(TomlConfig::default()),
        }
    }

    /// Parse config text directly; parse errors fall back to defaults.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => Self::resolve(cfg),
            Err(e) => {
                log::warn!("config.toml parse error: {e}; using default settings");
                Self::resolve(TomlConfig::default())
            }
        }
    }

    fn resolve(toml_cfg: TomlConfig) -> Self {
        let mut render = RenderConfig {
            frame_ms: toml_cfg.render.frame_ms,
            cell_width_px: toml_cfg.render.cell_width_px,
            cell_height_px: toml_cfg.render.cell_height_px,
        };

        if render.frame_ms == 0 {
            log::warn!("render.frame_ms must be positive; using {}", default_frame_ms());
            render.frame_ms = default_frame_ms();
        }
        if !(render.cell_width_px > 0.0) || !(render.cell_height_px > 0.0) {
            log::warn!("cell size must be positive; using {}x{}", default_cell_width(), default_cell_height());
            render.cell_width_px = default_cell_width();
            render.cell_height_px = default_cell_height();
        }

        let deadline = match toml_cfg.countdown.deadline.as_deref() {
            None => DeadlineSource::Window,
            Some(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(at) => DeadlineSource::Fixed(at.timestamp_millis()),
                Err(e) => {
                    log::warn!("countdown.deadline {text:?} is not RFC 3339 ({e}); using 24h window");
                    DeadlineSource::Window
                }
            },
        };

        PageConfig { render, deadline }
    }
}

/// Candidate directories to search: exe dir, then CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    log::info!("using {}", path.display());
                    return Some(text);
                }
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = PageConfig::from_toml_str("");
        assert_eq!(cfg.render.frame_ms, 16);
        assert_eq!(cfg.render.cell_px(), (8.0, 16.0));
        assert_eq!(cfg.deadline, DeadlineSource::Window);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = PageConfig::from_toml_str("[render]\nframe_ms = 33\n");
        assert_eq!(cfg.render.frame_ms, 33);
        assert_eq!(cfg.render.cell_height_px, 16.0);
    }

    #[test]
    fn fixed_deadline_parses() {
        let cfg = PageConfig::from_toml_str("[countdown]\ndeadline = \"2024-01-01T00:00:00Z\"\n");
        assert_eq!(cfg.deadline, DeadlineSource::Fixed(1_704_067_200_000));
    }

    #[test]
    fn bad_deadline_falls_back_to_window() {
        let cfg = PageConfig::from_toml_str("[countdown]\ndeadline = \"next tuesday\"\n");
        assert_eq!(cfg.deadline, DeadlineSource::Window);
    }

    #[test]
    fn invalid_values_are_replaced() {
        let cfg = PageConfig::from_toml_str("[render]\nframe_ms = 0\ncell_width_px = -1.0\n");
        assert_eq!(cfg.render.frame_ms, 16);
        assert_eq!(cfg.render.cell_px(), (8.0, 16.0));
    }

    #[test]
    fn syntax_error_gives_defaults() {
        let cfg = PageConfig::from_toml_str("[render\nframe_ms = ");
        assert_eq!(cfg.render.frame_ms, 16);
    }
}
