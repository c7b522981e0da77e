use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// What a cached canvas texture was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceKey {
    /// `Drawing::revision` at render time
    pub revision: u64,
    /// Output size in physical pixels
    pub size_px: [u32; 2],
}

/// Keeps the committed-stroke surface uploaded as a single egui texture.
#[derive(Default)]
pub struct SurfaceCache {
    texture: Option<TextureHandle>,
    key: Option<SurfaceKey>,
    rebuilds: u64,
}

impl std::fmt::Debug for SurfaceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceCache")
            .field("key", &self.key)
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<SurfaceKey> {
        self.key
    }

    pub fn is_current(&self, key: SurfaceKey) -> bool {
        self.key == Some(key)
    }

    /// Number of times the texture has been re-rendered.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Return the cached texture, rendering a new image with `render` when
    /// `key` differs from what is cached.
    pub fn get_or_render<F>(&mut self, ctx: &Context, key: SurfaceKey, render: F) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        if let (Some(texture), true) = (&self.texture, self.is_current(key)) {
            return texture.id();
        }

        let image = render();
        self.rebuilds += 1;
        log::debug!(
            "Rebuilding canvas surface: revision {} at {}x{}",
            key.revision,
            key.size_px[0],
            key.size_px[1]
        );

        let id = match &mut self.texture {
            Some(texture) => {
                texture.set(image, TextureOptions::LINEAR);
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("canvas_surface", image, TextureOptions::LINEAR);
                let id = texture.id();
                self.texture = Some(texture);
                id
            }
        };
        self.key = Some(key);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> ColorImage {
        ColorImage::new([4, 4], egui::Color32::WHITE)
    }

    #[test]
    fn test_same_key_hits_cache() {
        let ctx = Context::default();
        let mut cache = SurfaceCache::new();
        let key = SurfaceKey { revision: 1, size_px: [4, 4] };

        let first = cache.get_or_render(&ctx, key, blank);
        let second = cache.get_or_render(&ctx, key, || panic!("should not re-render"));

        assert_eq!(first, second);
        assert_eq!(cache.rebuilds(), 1);
    }

    #[test]
    fn test_new_revision_rebuilds_in_place() {
        let ctx = Context::default();
        let mut cache = SurfaceCache::new();

        let first = cache.get_or_render(&ctx, SurfaceKey { revision: 1, size_px: [4, 4] }, blank);
        let second = cache.get_or_render(&ctx, SurfaceKey { revision: 2, size_px: [4, 4] }, blank);

        assert_eq!(first, second);
        assert_eq!(cache.rebuilds(), 2);
        assert_eq!(cache.key().map(|k| k.revision), Some(2));
    }
}
