use std::path::{Path, PathBuf};
use anyhow::Context;
use tracing::instrument;

pub mod locator;
pub use locator::{AssetLocator, find_assets_dir, STAMP_FILE_NAME};


/// Read access to files under the located demo assets directory, addressed by virtual paths.
#[derive(Debug, Clone)]
pub struct Assets {
	root: Box<Path>,
}

impl Assets {
	#[instrument(name="assets init")]
	pub fn locate() -> anyhow::Result<Assets> {
		let root = find_assets_dir(true)
			.with_context(|| format!("Can't find a demo assets directory containing '{STAMP_FILE_NAME}'"))?;

		Ok(Assets::new(root))
	}

	pub fn new(root: impl Into<PathBuf>) -> Assets {
		let root = root.into().into_boxed_path();
		log::info!("Assets Root Path: {}", root.display());
		Assets { root }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path(&self, virtual_path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
		let virtual_path = virtual_path.as_ref();

		let clean_path = clean_virtual_path(virtual_path.components())
			.with_context(|| format!("Invalid asset path '{}'", virtual_path.display()))?;

		Ok(self.root.join(clean_path))
	}

	pub fn exists(&self, virtual_path: impl AsRef<Path>) -> bool {
		self.path(virtual_path)
			.is_ok_and(|path| path.is_file())
	}

	#[instrument(skip_all)]
	pub fn load_data(&self, virtual_path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
		let path = self.path(virtual_path)?;
		std::fs::read(&path)
			.with_context(|| format!("Failed to read asset '{}'", path.display()))
	}
}



fn clean_virtual_path(mut components: std::path::Components<'_>) -> anyhow::Result<&Path> {
	use std::path::Component;

	for component in components.clone() {
		match component {
			// Virtual paths are always relative to the assets root.
			Component::RootDir => {
				let _ = components.next();
			}

			Component::CurDir => {}

			Component::Normal(text) => {
				for byte in text.as_encoded_bytes() {
					let is_valid = byte.is_ascii_alphanumeric()
						|| [b' ', b'_', b'-', b'.'].contains(byte);

					anyhow::ensure!(is_valid, "Asset paths may only contain ascii alphanumeric characters or limited punctuation.");
				}
			}

			Component::ParentDir => anyhow::bail!("References to parent directories '..' in asset paths are not allowed."),
			Component::Prefix(prefix) => anyhow::bail!("Path prefixes (like {:?}) in asset paths are not allowed.", prefix.as_os_str()),
		}
	}

	Ok(components.as_path())
}



#[cfg(test)]
mod test {
	use super::*;

	fn clean(path: &str) -> anyhow::Result<PathBuf> {
		clean_virtual_path(Path::new(path).components()).map(Path::to_path_buf)
	}

	#[test]
	fn virtual_paths_are_relative_to_root() {
		assert_eq!(clean("/fonts/lato_regular.ttf").unwrap(), Path::new("fonts/lato_regular.ttf"));
		assert_eq!(clean("fonts/lato_bold.ttf").unwrap(), Path::new("fonts/lato_bold.ttf"));
	}

	#[test]
	fn escaping_the_root_is_rejected() {
		assert!(clean("../secrets.txt").is_err());
		assert!(clean("fonts/../../x").is_err());
		assert!(clean("fonts/l*ato.ttf").is_err());
	}

	#[test]
	fn load_data_reads_under_root() {
		let root = std::env::temp_dir().join(format!("demokit-assets-load-{}", std::process::id()));
		std::fs::create_dir_all(root.join("audio")).unwrap();
		std::fs::write(root.join("audio/tone.raw"), [1u8, 2, 3]).unwrap();

		let assets = Assets::new(&root);
		assert_eq!(assets.load_data("/audio/tone.raw").unwrap(), vec![1, 2, 3]);
		assert!(assets.exists("audio/tone.raw"));
		assert!(!assets.exists("audio/missing.raw"));
		assert!(assets.load_data("audio/missing.raw").is_err());

		let _ = std::fs::remove_dir_all(&root);
	}
}
