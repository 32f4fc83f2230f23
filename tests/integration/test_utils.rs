//! Shared test utilities for integration tests
//!
//! Provides isolated config directories and a deterministic tree so tests
//! never depend on the host clock or the user's configuration.

use std::sync::Mutex;
use tempfile::TempDir;
use wsfs::clock::FixedClock;
use wsfs::{NodeId, NodeType, Permissions, Timestamp, Tree, TreeLimits};

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub const FIXED_TIME: Timestamp = Timestamp {
    year: 2024,
    month: 6,
    day: 1,
    hour: 8,
    minute: 15,
};

pub const RW: Permissions = Permissions::from_bits(6);

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        if let Some(orig) = self.home {
            std::env::set_var("HOME", orig);
        } else {
            std::env::remove_var("HOME");
        }

        if let Some(orig) = self.xdg_config_home {
            std::env::set_var("XDG_CONFIG_HOME", orig);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointing into `test_dir`.
///
/// XDG_CONFIG_HOME is `test_dir` itself, so the global config file lives at
/// `test_dir/wsfs/config.toml`. The original environment is restored afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// Tree with default limits whose every node is stamped [`FIXED_TIME`].
pub fn fixed_tree() -> Tree {
    fixed_tree_with_limits(TreeLimits::default())
}

pub fn fixed_tree_with_limits(limits: TreeLimits) -> Tree {
    Tree::with_clock(limits, Box::new(FixedClock(FIXED_TIME))).unwrap()
}

pub fn mkdir(tree: &mut Tree, parent: NodeId, name: &str) -> NodeId {
    tree.create(parent, Some(name), NodeType::Directory, Permissions::ALL)
        .unwrap()
}

pub fn touch(tree: &mut Tree, parent: NodeId, name: &str) -> NodeId {
    tree.create(parent, Some(name), NodeType::File, RW).unwrap()
}

pub fn child_names(tree: &Tree, dir: NodeId) -> Vec<String> {
    tree.children(dir)
        .unwrap()
        .into_iter()
        .map(|c| tree.node(c).unwrap().name().to_string())
        .collect()
}
