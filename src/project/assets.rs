use std::path::Path;

use strum::Display;

/// Media kind of an asset, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
    Other,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("mp4" | "mov" | "flv") => Self::Video,
            Some("mp3" | "wav" | "wave") => Self::Audio,
            Some("jpg" | "jpeg" | "png" | "gif") => Self::Image,
            _ => Self::Other,
        }
    }
}

/// One file in a project's asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Display name: the path without a leading `assets/`.
    pub name: String,
    /// Path as the backend reports it; used for removal and download.
    pub path: String,
    pub kind: AssetKind,
}

impl Asset {
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.strip_prefix("assets/").unwrap_or(&path).to_string();
        Self {
            kind: AssetKind::from_path(&path),
            name,
            path,
        }
    }
}

/// A project's assets, in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: paths.into_iter().map(Asset::from_path).collect(),
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn names_of(&self, kind: AssetKind) -> impl Iterator<Item = &str> {
        self.assets
            .iter()
            .filter(move |asset| asset.kind == kind)
            .map(|asset| asset.name.as_str())
    }

    pub fn image_names(&self) -> Vec<&str> {
        self.names_of(AssetKind::Image).collect()
    }

    pub fn video_names(&self) -> Vec<&str> {
        self.names_of(AssetKind::Video).collect()
    }

    /// Images first, then videos.
    pub fn image_and_video_names(&self) -> Vec<&str> {
        self.names_of(AssetKind::Image)
            .chain(self.names_of(AssetKind::Video))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(AssetKind::from_path("intro.MP4"), AssetKind::Video);
        assert_eq!(AssetKind::from_path("jingle.Wave"), AssetKind::Audio);
        assert_eq!(AssetKind::from_path("logo.JPEG"), AssetKind::Image);
        assert_eq!(AssetKind::from_path("fonts/roboto.ttf"), AssetKind::Other);
        assert_eq!(AssetKind::from_path("README"), AssetKind::Other);
    }

    #[test]
    fn name_drops_only_leading_assets_prefix() {
        assert_eq!(Asset::from_path("assets/logo.png").name, "logo.png");
        assert_eq!(Asset::from_path("img/assets/logo.png").name, "img/assets/logo.png");
    }

    #[test]
    fn catalog_lists_images_before_videos() {
        let catalog = AssetCatalog::from_paths([
            "assets/intro.mp4",
            "assets/logo.png",
            "assets/music.mp3",
            "assets/banner.gif",
        ]);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.image_names(), vec!["logo.png", "banner.gif"]);
        assert_eq!(catalog.video_names(), vec!["intro.mp4"]);
        assert_eq!(
            catalog.image_and_video_names(),
            vec!["logo.png", "banner.gif", "intro.mp4"]
        );
    }
}
