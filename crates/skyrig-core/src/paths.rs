//! Resource directory layout.
//!
//! Every asset is addressed as a `(ResourceDirectory, name)` pair. The
//! directory maps to a path relative to a resource root, which defaults to
//! the directory holding the executable.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;

/// Logical resource directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceDirectory {
    Textures,
    Meshes,
    Fonts,
    Animations,
    Shaders,
    MiddlewareText,
    MiddlewareUi,
}

impl ResourceDirectory {
    /// All directories, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Textures,
        Self::Meshes,
        Self::Fonts,
        Self::Animations,
        Self::Shaders,
        Self::MiddlewareText,
        Self::MiddlewareUi,
    ];

    /// Default path relative to the resource root.
    #[must_use]
    pub const fn default_relative_path(self) -> &'static str {
        match self {
            Self::Textures => "Assets/Textures",
            Self::Meshes => "Assets/Meshes",
            Self::Fonts => "Assets/Fonts",
            Self::Animations => "Assets/Animation",
            Self::Shaders => "Assets/Shaders",
            Self::MiddlewareText => "Middleware/Text",
            Self::MiddlewareUi => "Middleware/UI",
        }
    }
}

/// Maps resource directories to concrete paths.
#[derive(Clone, Debug)]
pub struct ResourcePaths {
    root: PathBuf,
    relative: HashMap<ResourceDirectory, PathBuf>,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self::with_root(".")
    }
}

impl ResourcePaths {
    /// Default layout under the given root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let relative = ResourceDirectory::ALL
            .iter()
            .map(|dir| (*dir, PathBuf::from(dir.default_relative_path())))
            .collect();
        Self {
            root: root.into(),
            relative,
        }
    }

    /// Default layout rooted at the executable's directory.
    ///
    /// Falls back to the working directory when the executable path is
    /// unavailable.
    #[must_use]
    pub fn from_program_directory() -> Self {
        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_root(root)
    }

    /// Platforms that ship resources inside an app bundle use the bundle
    /// layout as-is and ignore relative overrides.
    #[must_use]
    pub const fn platform_uses_bundled_resources() -> bool {
        cfg!(any(target_os = "ios", target_os = "android"))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    /// Override the relative path of one directory.
    pub fn set_relative_path(&mut self, dir: ResourceDirectory, path: impl Into<PathBuf>) {
        self.relative.insert(dir, path.into());
    }

    /// Absolute (root-joined) path of a directory.
    #[must_use]
    pub fn directory(&self, dir: ResourceDirectory) -> PathBuf {
        match self.relative.get(&dir) {
            Some(relative) => self.root.join(relative),
            None => self.root.join(dir.default_relative_path()),
        }
    }

    /// Path of a named resource inside a directory.
    #[must_use]
    pub fn resolve(&self, dir: ResourceDirectory, name: impl AsRef<Path>) -> PathBuf {
        self.directory(dir).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let paths = ResourcePaths::with_root("/game");
        assert_eq!(
            paths.resolve(ResourceDirectory::Textures, "skybox/right.png"),
            PathBuf::from("/game/Assets/Textures/skybox/right.png")
        );
        assert_eq!(
            paths.directory(ResourceDirectory::Animations),
            PathBuf::from("/game/Assets/Animation")
        );
    }

    #[test]
    fn relative_override() {
        let mut paths = ResourcePaths::with_root("root");
        paths.set_relative_path(ResourceDirectory::Fonts, "fonts");
        assert_eq!(
            paths.resolve(ResourceDirectory::Fonts, "a.otf"),
            PathBuf::from("root/fonts/a.otf")
        );
    }
}
