//! RGUI demo application
//!
//! Opens the demo markup on a software canvas, wires up a few callbacks and
//! replays a scripted pointer path until the exit button is released.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use rgui::foundation::logging;
use rgui::prelude::*;

const DEFAULT_CONFIG: &str = "rgui.toml";

/// Fatal demo errors, each with its own exit status
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("Could not save snapshot: {0}")]
    Snapshot(rgui::ui::BackendError),
}

impl DemoError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Ui(UiError::Config(_)) => 2,
            Self::Ui(UiError::Markup(MarkupError::Io(_))) => 3,
            Self::Ui(UiError::Markup(_) | UiError::NoRoot) => 4,
            Self::Ui(UiError::Tree(_)) => 5,
            Self::Ui(UiError::Backend(_) | UiError::Asset(_)) => 6,
            Self::Snapshot(_) => 7,
        }
    }
}

fn load_config() -> Result<RguiConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => RguiConfig::load_from_file(&path),
        None if Path::new(DEFAULT_CONFIG).exists() => RguiConfig::load_from_file(DEFAULT_CONFIG),
        None => Ok(RguiConfig::default()),
    }
}

/// Pointer path over the toolbar buttons and down towards the exit button
fn script(size: Vec2) -> ScriptedInput {
    let mut input = ScriptedInput::sweep(Vec2::new(size.x - 1, size.y - 1), Vec2::new(30, 30), 40);
    input.push_sweep(Vec2::new(30, 30), Vec2::new(400, 30), 60);
    input.push_sweep(Vec2::new(400, 30), Vec2::new(320, 200), 40);
    input
}

fn register_callbacks(window: &mut UiWindow<SoftwareCanvas>, frame_interval_ms: u64, running: &Rc<Cell<bool>>) {
    // Hover inversion comes from the stock `Button` builder
    for name in ["button1", "button2", "button3", "button4"] {
        if window.find(name).is_none() {
            log::warn!("Demo markup has no '{}'", name);
        }
    }

    // Exit button bobs up and down, driven by its own tick count
    let ticks = Cell::new(0_u64);
    window.add_callback("button1", EventKind::Tick, callback(move |tree, id| {
        ticks.set(ticks.get() + 1);
        let elapsed_ms = (ticks.get() * frame_interval_ms) as f64;
        if let Some(element) = tree.get(id) {
            let y = 270 + (50.0 * (elapsed_ms / 600.0).sin()) as i32;
            let x = element.relative_position.x;
            tree.set_relative_position(id, Vec2::new(x, y));
        }
    }));

    let running = Rc::clone(running);
    window.add_callback("button1", EventKind::PrimaryUp, callback(move |_, _| {
        log::info!("Exit button released");
        running.set(false);
    }));
}

fn run(config: &RguiConfig) -> Result<u32, DemoError> {
    let canvas = SoftwareCanvas::new().with_clear_color(Color::from_rgba(0, 0, 0, 255));
    let mut window = UiWindow::from_markup_file(&config.markup_path, canvas, config)?;
    log::info!("Opened '{}' with {} elements", window.title(), window.tree().len());

    let running = Rc::new(Cell::new(true));
    register_callbacks(&mut window, config.frame_interval_ms, &running);

    let root_size = window
        .tree()
        .root()
        .and_then(|root| window.tree().get(root))
        .map_or_else(|| Vec2::new(1, 1), |root| root.size);
    let mut input = script(root_size);
    let interval = Duration::from_millis(config.frame_interval_ms);

    let mut frames = 0;
    while running.get() && frames < config.max_frames {
        // Once the script runs out, click wherever the exit button is now
        let frame_input = input.poll().unwrap_or_else(|| {
            let target = window
                .find("button1")
                .and_then(|id| window.tree().get(id))
                .map_or(Vec2::new(0, 0), |button| button.absolute_position() + button.size / 2);
            FrameInput::at(target.x, target.y).with(InputSignals::PRIMARY_RELEASED)
        });

        let outcome = window.frame(frame_input)?;
        frames += 1;
        if outcome.quit_requested {
            break;
        }
        std::thread::sleep(interval);
    }

    if let Some(path) = &config.snapshot_path {
        window.backend().save_png(path).map_err(DemoError::Snapshot)?;
    }
    Ok(frames)
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init_with_filter("info");
            let error = DemoError::from(e);
            log::error!("{}", error);
            return ExitCode::from(error.exit_code());
        }
    };
    logging::init_with_filter(&config.log_filter);

    log::info!("Starting RGUI demo with {}", display_path(&config.markup_path));
    match run(&config) {
        Ok(frames) => {
            log::info!("Demo finished after {} frames", frames);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Demo failed: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path)).display().to_string()
}
