/// Entry point and page loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::KeyCode;

use config::PageConfig;
use error::AppError;
use sim::event::PageEvent;
use sim::schedule::Schedule;
use sim::step;
use sim::world::PageState;
use ui::canvas::DotCanvas;
use ui::input::{cell_to_px, surface_extent, InputState};
use ui::renderer::Renderer;

/// Upper bound on one loop sleep, keeps input responsive.
const MAX_SLEEP: Duration = Duration::from_millis(5);
const TICK_PERIOD: Duration = Duration::from_secs(1);

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

fn main() {
    match logging::init() {
        Ok(Some(path)) => log::info!("logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: {e}"),
    }

    let config = PageConfig::load();
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        eprintln!("{}", AppError::TerminalInit(e));
        std::process::exit(1);
    }

    let result = run(&mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Mount the page, drive it until quit, then tear it down.
fn run(renderer: &mut Renderer, config: &PageConfig) -> Result<(), AppError> {
    let cell_px = config.render.cell_px();
    let (cols, rows) = renderer.size();
    let extent = surface_extent(cols, rows, cell_px);

    let mut page = PageState::mount(extent, now_ms(), config.deadline, &mut rand::thread_rng());
    log::info!(
        "mounted {} particles on {}x{} cells ({}x{} px), deadline {}",
        page.field.as_ref().map_or(0, |f| f.len()),
        cols, rows, extent.width, extent.height, page.countdown.deadline_ms(),
    );

    let mut canvas = DotCanvas::new(cols as usize, rows as usize, cell_px);
    let start = Instant::now();
    let mut frames = Schedule::immediate(Duration::from_millis(config.render.frame_ms), start);
    let mut interval = Schedule::after(TICK_PERIOD, start);

    let result = page_loop(&mut page, renderer, &mut canvas, &mut frames, &mut interval, cell_px);

    // Teardown: stop both recurring activities before releasing the page.
    frames.cancel();
    interval.cancel();
    for event in step::unmount(&mut page) {
        log_event(&event);
    }

    result
}

fn page_loop(
    page: &mut PageState,
    renderer: &mut Renderer,
    canvas: &mut DotCanvas,
    frames: &mut Schedule,
    interval: &mut Schedule,
    cell_px: (f32, f32),
) -> Result<(), AppError> {
    let mut input = InputState::new();

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() || input.any_pressed(KEYS_QUIT) {
            break;
        }

        if let Some((cols, rows)) = input.resized() {
            renderer.resize(cols, rows);
            canvas.resize(cols as usize, rows as usize);
            for event in step::resize(page, surface_extent(cols, rows, cell_px)) {
                log_event(&event);
            }
        }

        if let Some((col, row)) = input.pointer_cell() {
            page.set_pointer(cell_to_px(col, row, cell_px));
        }

        let now = Instant::now();

        if interval.poll(now) {
            for event in step::tick(page, now_ms()) {
                log_event(&event);
            }
            if !page.countdown.is_running() {
                interval.cancel();
            }
        }

        if frames.poll(now) {
            if let Some(stats) = step::frame(page, canvas) {
                log::trace!(
                    "frame: {} particles, {} pairs, {} links, {} pointer links, {} reflections",
                    stats.particles, stats.pair_checks, stats.links, stats.pointer_links, stats.reflections,
                );
            }
            renderer.render(page, canvas).map_err(AppError::Render)?;
        }

        let wait = [frames.time_until(now), interval.time_until(now)]
            .into_iter()
            .flatten()
            .min()
            .map_or(MAX_SLEEP, |d| d.min(MAX_SLEEP));
        std::thread::sleep(wait);
    }

    Ok(())
}

fn log_event(event: &PageEvent) {
    match event {
        PageEvent::CountdownChanged(left) => log::debug!("countdown {left}"),
        PageEvent::CountdownExpired => log::info!("deadline reached, countdown stopped"),
        PageEvent::Resized(extent) => log::debug!("surface resized to {}x{} px", extent.width, extent.height),
        PageEvent::Unmounted => log::info!("page unmounted"),
    }
}
