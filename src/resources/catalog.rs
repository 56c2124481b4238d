//! Resource catalog.
//!
//! The authoritative cache of every loaded asset: one [`KeyedCache`] per
//! [`ResourceKind`], all holding the handle types of a single
//! [`MediaLoader`]. The catalog owns its handles; callers only ever borrow
//! them. Once [`retire`](ResourceCatalog::retire)d (after the lifecycle
//! manager drained it) the catalog refuses both registration and lookup.

use std::fmt;

use crate::platform::{Asset, MediaLoader};
use crate::resources::error::ResourceError;
use crate::resources::keyedcache::KeyedCache;
use crate::resources::kind::ResourceKind;

/// Borrowed handle tagged with its kind.
pub enum AssetRef<'a, P: MediaLoader + ?Sized> {
    Font(&'a P::Font),
    Image(&'a P::Image),
    Sound(&'a P::Sound),
    Music(&'a P::Music),
}

impl<P: MediaLoader + ?Sized> AssetRef<'_, P> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            AssetRef::Font(_) => ResourceKind::Font,
            AssetRef::Image(_) => ResourceKind::Image,
            AssetRef::Sound(_) => ResourceKind::Sound,
            AssetRef::Music(_) => ResourceKind::Music,
        }
    }
}

/// A registration the catalog refused, with the asset handed back unreleased.
pub struct Rejected<P: MediaLoader + ?Sized> {
    pub error: ResourceError,
    pub asset: Asset<P>,
}

impl<P: MediaLoader + ?Sized> fmt::Debug for Rejected<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .field("kind", &self.asset.kind())
            .finish()
    }
}

/// Per-kind name → handle caches.
pub struct ResourceCatalog<P: MediaLoader> {
    fonts: KeyedCache<P::Font>,
    images: KeyedCache<P::Image>,
    sounds: KeyedCache<P::Sound>,
    music: KeyedCache<P::Music>,
    retired: bool,
}

impl<P: MediaLoader> Default for ResourceCatalog<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MediaLoader> ResourceCatalog<P> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            fonts: KeyedCache::new(ResourceKind::Font),
            images: KeyedCache::new(ResourceKind::Image),
            sounds: KeyedCache::new(ResourceKind::Sound),
            music: KeyedCache::new(ResourceKind::Music),
            retired: false,
        }
    }

    fn ensure_live(&self, action: &str) -> Result<(), ResourceError> {
        if self.retired {
            Err(ResourceError::LifecycleMisuse(format!(
                "{} after the catalog was freed",
                action
            )))
        } else {
            Ok(())
        }
    }

    /// Add `asset` under `name` in its kind's cache.
    ///
    /// A refused asset comes back inside [`Rejected`]; the catalog never
    /// drops a handle it did not store.
    pub fn register(&mut self, name: impl Into<String>, asset: Asset<P>) -> Result<(), Rejected<P>> {
        if let Err(error) = self.ensure_live("register") {
            return Err(Rejected { error, asset });
        }
        match asset {
            Asset::Font(h) => self
                .fonts
                .register(name, h)
                .map_err(|(error, h)| Rejected { error, asset: Asset::Font(h) }),
            Asset::Image(h) => self
                .images
                .register(name, h)
                .map_err(|(error, h)| Rejected { error, asset: Asset::Image(h) }),
            Asset::Sound(h) => self
                .sounds
                .register(name, h)
                .map_err(|(error, h)| Rejected { error, asset: Asset::Sound(h) }),
            Asset::Music(h) => self
                .music
                .register(name, h)
                .map_err(|(error, h)| Rejected { error, asset: Asset::Music(h) }),
        }
    }

    /// Find `name` among the assets of `kind`.
    pub fn lookup(&self, kind: ResourceKind, name: &str) -> Result<AssetRef<'_, P>, ResourceError> {
        Ok(match kind {
            ResourceKind::Font => AssetRef::Font(self.font(name)?),
            ResourceKind::Image => AssetRef::Image(self.image(name)?),
            ResourceKind::Sound => AssetRef::Sound(self.sound(name)?),
            ResourceKind::Music => AssetRef::Music(self.music(name)?),
        })
    }

    pub fn font(&self, name: &str) -> Result<&P::Font, ResourceError> {
        self.ensure_live("font lookup")?;
        self.fonts.lookup(name)
    }

    pub fn image(&self, name: &str) -> Result<&P::Image, ResourceError> {
        self.ensure_live("image lookup")?;
        self.images.lookup(name)
    }

    pub fn sound(&self, name: &str) -> Result<&P::Sound, ResourceError> {
        self.ensure_live("sound lookup")?;
        self.sounds.lookup(name)
    }

    pub fn music(&self, name: &str) -> Result<&P::Music, ResourceError> {
        self.ensure_live("music lookup")?;
        self.music.lookup(name)
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        match kind {
            ResourceKind::Font => self.fonts.contains(name),
            ResourceKind::Image => self.images.contains(name),
            ResourceKind::Sound => self.sounds.contains(name),
            ResourceKind::Music => self.music.contains(name),
        }
    }

    /// Names registered for `kind`, sorted.
    pub fn names(&self, kind: ResourceKind) -> Vec<String> {
        let mut names: Vec<String> = match kind {
            ResourceKind::Font => self.fonts.names().map(str::to_string).collect(),
            ResourceKind::Image => self.images.names().map(str::to_string).collect(),
            ResourceKind::Sound => self.sounds.names().map(str::to_string).collect(),
            ResourceKind::Music => self.music.names().map(str::to_string).collect(),
        };
        names.sort();
        names
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Font => self.fonts.len(),
            ResourceKind::Image => self.images.len(),
            ResourceKind::Sound => self.sounds.len(),
            ResourceKind::Music => self.music.len(),
        }
    }

    /// Number of entries across all kinds.
    pub fn total(&self) -> usize {
        ResourceKind::ALL.iter().map(|&kind| self.len(kind)).sum()
    }

    /// Remove every entry of `kind`, handing ownership of the handles back.
    pub fn drain(&mut self, kind: ResourceKind) -> Vec<(String, Asset<P>)> {
        match kind {
            ResourceKind::Font => self.fonts.drain().map(|(n, h)| (n, Asset::Font(h))).collect(),
            ResourceKind::Image => self.images.drain().map(|(n, h)| (n, Asset::Image(h))).collect(),
            ResourceKind::Sound => self.sounds.drain().map(|(n, h)| (n, Asset::Sound(h))).collect(),
            ResourceKind::Music => self.music.drain().map(|(n, h)| (n, Asset::Music(h))).collect(),
        }
    }

    /// Mark the catalog as torn down.
    pub fn retire(&mut self) {
        self.retired = true;
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }
}
