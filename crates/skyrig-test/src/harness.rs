//! Headless hosts for driving apps in tests.

use std::sync::Arc;

use skyrig_app::{App, AppConfig, Host, Lifecycle};
use skyrig_core::{AssetStore, MemoryAssets, ResourcePaths};
use skyrig_gpu::{NullDeviceFactory, NullDeviceProbe};
use skyrig_platform::HeadlessWindow;

/// Null device, headless window and in-memory assets, plus a probe into the
/// device.
pub struct TestHost {
    factory: NullDeviceFactory,
    assets: Arc<dyn AssetStore>,
    paths: ResourcePaths,
    args: Vec<String>,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// Empty assets rooted at `/test`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: NullDeviceFactory::new(),
            assets: Arc::new(MemoryAssets::new()),
            paths: ResourcePaths::with_root("/test"),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_assets(mut self, paths: ResourcePaths, assets: Arc<dyn AssetStore>) -> Self {
        self.paths = paths;
        self.assets = assets;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub fn probe(&self) -> NullDeviceProbe {
        self.factory.probe()
    }

    /// Collaborators for a lifecycle, with the window sized from `config`.
    #[must_use]
    pub fn into_host(self, config: &AppConfig) -> Host {
        Host {
            factory: Box::new(self.factory),
            window: Box::new(HeadlessWindow::new(&config.window_config())),
            assets: self.assets,
            paths: self.paths,
            args: self.args,
        }
    }

    /// Wrap `app` in a lifecycle and return it with the device probe.
    pub fn lifecycle<A: App>(self, app: A, config: &AppConfig) -> (Lifecycle<A>, NullDeviceProbe) {
        let probe = self.probe();
        let host = self.into_host(config);
        (Lifecycle::new(app, host, config), probe)
    }
}
