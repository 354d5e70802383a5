//! skyrig sample viewer
//!
//! Plays a skeletal animation under a skybox, with a settings panel for
//! playback and debug drawing. The lifecycle controller owns the device; the
//! sample only creates and releases what it draws.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p skyrig-viewer -- [OPTIONS]
//! ```
//!
//! ## Examples
//!
//! ```bash
//! # Windowed, 4x MSAA, with vsync
//! cargo run -p skyrig-viewer -- --msaa 4 --vsync
//!
//! # 300 offscreen frames on the built-in assets, switching MSAA at frame 100
//! cargo run -p skyrig-viewer -- --headless 300 --builtin-assets --device-change-at 100
//! ```
//!
//! ## Controls
//!
//! - `WASD` / left stick: move, right mouse drag / right stick: look
//! - `Space`: reset camera, `F1`: toggle UI, `Alt+Enter`: toggle fullscreen
//! - `Esc`: exit
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod assets;
mod gpu;
mod scene;
mod skybox;
mod uniforms;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use skyrig_app::{init_logging, run, run_headless, AppConfig, Lifecycle};
use skyrig_core::{AssetStore, Backend, DeviceConfig, DiskAssets, SampleCount};
use skyrig_gpu::NullDeviceFactory;
use skyrig_input::InputDevice;
use tracing::info;

use crate::app::SampleApp;

const TITLE: &str = "skyrig - Skeletal Animation";

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "skyrig-viewer", version, about = "Skeletal animation sample")]
struct CliArgs {
    /// Window width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Start fullscreen.
    #[arg(long)]
    fullscreen: bool,

    /// MSAA sample count (1, 2, 4 or 8).
    #[arg(long, default_value_t = 1)]
    msaa: u32,

    /// Present with vertical sync.
    #[arg(long)]
    vsync: bool,

    /// Graphics backend (vulkan, d3d12, metal, null).
    #[arg(long)]
    backend: Option<Backend>,

    /// Run this many frames offscreen, then exit.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Resource root containing `Assets/`. Defaults to the program directory.
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// Input device bound at startup (keyboard, gamepad, touch).
    #[arg(long, default_value = "keyboard")]
    input: InputDevice,

    /// Toggle MSAA between 1x and 4x before this frame (headless only).
    #[arg(long, value_name = "FRAME")]
    device_change_at: Option<u64>,

    /// Use the generated in-memory asset pack instead of files on disk.
    #[arg(long)]
    builtin_assets: bool,
}

impl CliArgs {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let backend = self.backend.unwrap_or_else(|| {
            if self.headless.is_some() {
                Backend::Null
            } else {
                Backend::preferred()
            }
        });
        let device = DeviceConfig::default()
            .with_backend(backend)
            .with_sample_count(SampleCount::try_from(self.msaa)?)
            .with_vsync(self.vsync);
        device.validate()?;

        let mut config = AppConfig::new(TITLE)
            .with_size(self.width, self.height)
            .with_fullscreen(self.fullscreen)
            .with_device(device)
            .with_input_device(self.input)
            .with_args(program_args(std::env::args()));
        if let Some(root) = self.resources {
            config = config.with_resource_root(root);
        }
        Ok(config)
    }
}

/// Command line with the program name dropped.
fn program_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter().skip(1).collect()
}

/// Switch between 1x and 4x MSAA.
fn toggled_msaa(device: DeviceConfig) -> DeviceConfig {
    let samples = if device.sample_count == SampleCount::X1 {
        SampleCount::X4
    } else {
        SampleCount::X1
    };
    device.with_sample_count(samples)
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = CliArgs::parse();
    let headless = args.headless;
    let device_change_at = args.device_change_at;
    let builtin = args.builtin_assets;
    let config = args.into_config()?;

    let assets: Arc<dyn AssetStore> = if builtin {
        assets::builtin(&config.resource_paths())?
    } else {
        Arc::new(DiskAssets)
    };
    let factory = Box::new(NullDeviceFactory::new());

    let Some(frames) = headless else {
        return run(config, SampleApp::new(), factory, assets);
    };

    let stats = run_headless(
        &config,
        SampleApp::new(),
        factory,
        assets,
        frames,
        |frame, lifecycle: &mut Lifecycle<SampleApp>| {
            if device_change_at == Some(frame) {
                let device = toggled_msaa(*lifecycle.device_config());
                info!("Frame {frame}: switching to {}x MSAA", device.sample_count.count());
                lifecycle.change_device(device)?;
            }
            Ok(())
        },
    )?;
    info!("Rendered {} frames headless", stats.frames);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_a_windowed_single_sample_config() {
        let config = CliArgs::try_parse_from(["skyrig-viewer"])
            .unwrap()
            .into_config()
            .unwrap();
        assert_eq!((config.settings.width, config.settings.height), (1280, 720));
        assert!(!config.settings.fullscreen);
        assert_eq!(config.device.sample_count, SampleCount::X1);
        assert_eq!(config.device.backend, Backend::preferred());
        assert_eq!(config.input_device, InputDevice::KeyboardMouse);
    }

    #[test]
    fn headless_defaults_to_the_null_backend() {
        let args = CliArgs::try_parse_from([
            "skyrig-viewer",
            "--headless",
            "30",
            "--msaa",
            "4",
            "--input",
            "gamepad",
            "--resources",
            "/data",
        ])
        .unwrap();
        assert_eq!(args.headless, Some(30));
        let config = args.into_config().unwrap();
        assert_eq!(config.device.backend, Backend::Null);
        assert_eq!(config.device.sample_count, SampleCount::X4);
        assert_eq!(config.input_device, InputDevice::Gamepad);
        assert_eq!(config.resource_root, Some(PathBuf::from("/data")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(CliArgs::try_parse_from(["skyrig-viewer", "--backend", "glide"]).is_err());
        assert!(CliArgs::try_parse_from(["skyrig-viewer", "--input", "wheel"]).is_err());
        let odd_msaa = CliArgs::try_parse_from(["skyrig-viewer", "--msaa", "3"]).unwrap();
        assert!(odd_msaa.into_config().is_err());
    }

    #[test]
    fn program_name_is_not_passed_through() {
        let args = ["skyrig-viewer", "--msaa", "4"].map(String::from);
        assert_eq!(program_args(args), ["--msaa", "4"]);
        assert!(program_args(std::iter::empty()).is_empty());
    }

    #[test]
    fn msaa_toggle_round_trips() {
        let device = DeviceConfig::default();
        assert_eq!(toggled_msaa(device).sample_count, SampleCount::X4);
        assert_eq!(toggled_msaa(toggled_msaa(device)), device);
    }
}
