use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::instrument;


/// File whose presence marks a directory as the demo assets directory.
pub const STAMP_FILE_NAME: &str = "soloud_assets_stamp.txt";

/// How many directories above the search root are probed.
pub const PARENT_LEVELS: usize = 5;

/// Places the assets directory ends up relative to a checkout, build tree or install tree.
const LAYOUTS: [&str; 33] = [
	"assets",
	"demos/assets",
	"soloud/demos/assets",
	"external/soloud/demos/assets",
	"extern/soloud/demos/assets",
	"third_party/soloud/demos/assets",
	"deps/soloud/demos/assets",
	"dependencies/soloud/demos/assets",
	"vendor/soloud/demos/assets",

	"build/demos/assets",
	"build/soloud/demos/assets",
	"build/external/soloud/demos/assets",
	"build/extern/soloud/demos/assets",
	"build/third_party/soloud/demos/assets",
	"build/deps/soloud/demos/assets",
	"build/dependencies/soloud/demos/assets",
	"build/vendor/soloud/demos/assets",

	"bin/demos/assets",
	"bin/soloud/demos/assets",
	"bin/external/soloud/demos/assets",
	"bin/extern/soloud/demos/assets",
	"bin/third_party/soloud/demos/assets",
	"bin/deps/soloud/demos/assets",
	"bin/dependencies/soloud/demos/assets",
	"bin/vendor/soloud/demos/assets",

	"install/demos/assets",
	"install/soloud/demos/assets",
	"install/external/soloud/demos/assets",
	"install/extern/soloud/demos/assets",
	"install/third_party/soloud/demos/assets",
	"install/deps/soloud/demos/assets",
	"install/dependencies/soloud/demos/assets",
	"install/vendor/soloud/demos/assets",
];


/// Searches a fixed set of directories around `search_root` for the stamped assets directory and
/// remembers the first hit.
#[derive(Debug, Clone)]
pub struct AssetLocator {
	search_root: PathBuf,
	override_dir: Option<PathBuf>,
	cached: Option<PathBuf>,
}

impl AssetLocator {
	/// The build-time `DEMOKIT_ASSETS_DIR`, if set, is probed before anything else.
	pub fn new(search_root: impl Into<PathBuf>) -> AssetLocator {
		AssetLocator {
			search_root: search_root.into(),
			override_dir: option_env!("DEMOKIT_ASSETS_DIR").map(PathBuf::from),
			cached: None,
		}
	}

	pub fn from_current_dir() -> AssetLocator {
		AssetLocator::new(".")
	}

	pub fn with_override_dir(mut self, override_dir: Option<PathBuf>) -> AssetLocator {
		self.override_dir = override_dir;
		self
	}

	pub fn cached(&self) -> Option<&Path> {
		self.cached.as_deref()
	}

	/// Every directory probed, in probe order.
	pub fn candidates(&self) -> Vec<PathBuf> {
		let mut candidates = Vec::with_capacity(LAYOUTS.len() * (PARENT_LEVELS + 1) + 1);
		candidates.extend(self.override_dir.iter().cloned());

		let mut prefix = self.search_root.clone();

		for _ in 0..=PARENT_LEVELS {
			candidates.extend(LAYOUTS.iter().map(|layout| prefix.join(layout)));
			prefix.push("..");
		}

		candidates
	}

	/// Returns the canonicalized assets directory.
	///
	/// With `use_cache` a previous hit is returned without touching the filesystem. A miss never
	/// clears a previous hit.
	#[instrument(skip(self), fields(root=%self.search_root.display()))]
	pub fn find(&mut self, use_cache: bool) -> Option<PathBuf> {
		if use_cache && let Some(path) = &self.cached {
			return Some(path.clone())
		}

		for path in self.candidates() {
			log::trace!("Checking for demo assets in: {}", path.display());

			if !path.join(STAMP_FILE_NAME).is_file() {
				continue
			}

			match std::fs::canonicalize(&path) {
				Ok(canonical) => {
					log::info!("Found demo assets dir: {}", canonical.display());
					self.cached = Some(canonical.clone());
					return Some(canonical)
				}

				Err(err) => {
					log::warn!("Couldn't canonicalize '{}': {err}", path.display());
				}
			}
		}

		log::debug!("No demo assets dir found around '{}'", self.search_root.display());

		None
	}
}


static PROCESS_CACHE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Process-wide [`AssetLocator::find`] rooted at the working directory.
pub fn find_assets_dir(use_cache: bool) -> Option<PathBuf> {
	find_with_process_cache(AssetLocator::from_current_dir(), use_cache)
}

fn find_with_process_cache(mut locator: AssetLocator, use_cache: bool) -> Option<PathBuf> {
	let mut cache = PROCESS_CACHE.lock().unwrap_or_else(PoisonError::into_inner);

	locator.cached = cache.clone();

	let found = locator.find(use_cache);
	*cache = locator.cached;

	found
}



#[cfg(test)]
mod test {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct TempTree(PathBuf);

	impl TempTree {
		fn new() -> TempTree {
			static COUNTER: AtomicUsize = AtomicUsize::new(0);
			let id = COUNTER.fetch_add(1, Ordering::Relaxed);

			let root = std::env::temp_dir()
				.join(format!("demokit-assets-{}-{id}", std::process::id()));

			let _ = std::fs::remove_dir_all(&root);
			std::fs::create_dir_all(&root).unwrap();
			TempTree(root)
		}

		fn stamp(&self, relative: &str) -> PathBuf {
			let dir = self.0.join(relative);
			std::fs::create_dir_all(&dir).unwrap();
			std::fs::write(dir.join(STAMP_FILE_NAME), "").unwrap();
			dir
		}

		fn dir(&self, relative: &str) -> PathBuf {
			let dir = self.0.join(relative);
			std::fs::create_dir_all(&dir).unwrap();
			dir
		}
	}

	impl Drop for TempTree {
		fn drop(&mut self) {
			let _ = std::fs::remove_dir_all(&self.0);
		}
	}

	fn locator(root: &Path) -> AssetLocator {
		AssetLocator::new(root).with_override_dir(None)
	}

	#[test]
	fn finds_stamped_demos_assets() {
		let tree = TempTree::new();
		let assets = tree.stamp("demos/assets");

		let mut locator = locator(&tree.0);
		let found = locator.find(true);

		assert_eq!(found, Some(std::fs::canonicalize(&assets).unwrap()));
		assert_eq!(locator.cached(), found.as_deref());
	}

	#[test]
	fn cached_hit_skips_the_filesystem() {
		let tree = TempTree::new();
		let assets = tree.stamp("demos/assets");

		let mut locator = locator(&tree.0);
		let first = locator.find(true);
		assert!(first.is_some());

		// Once the stamp is gone only the cache can produce the old answer.
		std::fs::remove_file(assets.join(STAMP_FILE_NAME)).unwrap();

		assert_eq!(locator.find(true), first);
		assert_eq!(locator.find(false), None);
		assert_eq!(locator.cached(), first.as_deref(), "a miss must not clear the cache");
	}

	#[test]
	fn uncached_rescan_matches_on_unchanged_tree() {
		let tree = TempTree::new();
		tree.stamp("demos/assets");

		let mut locator = locator(&tree.0);
		let first = locator.find(true);
		let rescanned = locator.find(false);

		assert!(first.is_some());
		assert_eq!(first, rescanned);
	}

	#[test]
	fn directory_without_stamp_is_skipped() {
		let tree = TempTree::new();
		tree.dir("assets");
		let stamped = tree.stamp("build/demos/assets");

		let found = locator(&tree.0).find(false);
		assert_eq!(found, Some(std::fs::canonicalize(stamped).unwrap()));
	}

	#[test]
	fn walks_up_parent_directories() {
		let tree = TempTree::new();
		let assets = tree.stamp("assets");
		let deep = tree.dir("a/b/c");

		let found = locator(&deep).find(false);
		assert_eq!(found, Some(std::fs::canonicalize(assets).unwrap()));
	}

	#[test]
	fn stops_after_five_parent_levels() {
		let tree = TempTree::new();
		let start = tree.dir("a/b/c/d/e/f");

		let candidates = locator(&start).candidates();
		assert_eq!(candidates.len(), LAYOUTS.len() * (PARENT_LEVELS + 1));

		let deepest_prefix = start.join("../../../../..");
		assert_eq!(candidates.last(), Some(&deepest_prefix.join("install/vendor/soloud/demos/assets")));
	}

	#[test]
	fn override_dir_is_probed_first() {
		let tree = TempTree::new();
		tree.stamp("assets");
		let custom = tree.stamp("custom");

		let mut locator = AssetLocator::new(&tree.0).with_override_dir(Some(custom.clone()));
		assert_eq!(locator.candidates().first(), Some(&custom));
		assert_eq!(locator.find(false), Some(std::fs::canonicalize(custom).unwrap()));
	}

	// The only test touching the process cache.
	#[test]
	fn process_cache_is_shared_across_calls() {
		let tree = TempTree::new();
		let assets = tree.stamp("demos/assets");
		let canonical = std::fs::canonicalize(&assets).unwrap();

		assert_eq!(find_with_process_cache(locator(&tree.0), true), Some(canonical.clone()));
		assert_eq!(find_with_process_cache(locator(&tree.0), false), Some(canonical.clone()));

		std::fs::remove_file(assets.join(STAMP_FILE_NAME)).unwrap();

		// A fresh locator, and even a different root, still sees the earlier hit.
		let elsewhere = TempTree::new();
		assert_eq!(find_with_process_cache(locator(&elsewhere.0), true), Some(canonical.clone()));

		assert_eq!(find_with_process_cache(locator(&tree.0), false), None);
		assert_eq!(find_with_process_cache(locator(&tree.0), true), Some(canonical));
	}
}
