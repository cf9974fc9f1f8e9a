use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::pixels::{PixelBuffer, PixelFormat};

/// Stable handle to an image registered with a surface.
///
/// The generation makes handles to disposed images dangle safely instead of
/// aliasing whatever reuses the slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    image: Option<PixelBuffer>,
}

/// Generational slot storage for images.
#[derive(Debug, Default, Clone)]
pub struct ImageArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ImageArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: PixelBuffer) -> ImageId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.image = Some(image);
            return ImageId { index, generation: slot.generation };
        }
        self.slots.push(Slot { generation: 0, image: Some(image) });
        ImageId { index: (self.slots.len() - 1) as u32, generation: 0 }
    }

    pub fn get(&self, id: ImageId) -> Option<&PixelBuffer> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.image.as_ref())
    }

    pub fn get_mut(&mut self, id: ImageId) -> Option<&mut PixelBuffer> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.image.as_mut())
    }

    /// Two distinct images, the first shared and the second mutable.
    pub fn pair_mut(&mut self, src: ImageId, dst: ImageId) -> Option<(&PixelBuffer, &mut PixelBuffer)> {
        if src.index == dst.index {
            return None;
        }
        let (lo, hi) = (src.index.min(dst.index) as usize, src.index.max(dst.index) as usize);
        if hi >= self.slots.len() {
            return None;
        }
        let (left, right) = self.slots.split_at_mut(hi);
        let (a, b) = (&mut left[lo], &mut right[0]);
        let (s, d) = if src.index < dst.index { (a, b) } else { (b, a) };
        if s.generation != src.generation || d.generation != dst.generation {
            return None;
        }
        Some((s.image.as_ref()?, d.image.as_mut()?))
    }

    pub fn remove(&mut self, id: ImageId) -> Option<PixelBuffer> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let image = slot.image.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(image)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.image.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct TintEntry {
    tint: u32,
    revision: u64,
    image: PixelBuffer,
}

/// Tinted copies of images, one per image, valid while the tint and the
/// image revision are unchanged.
#[derive(Debug, Default, Clone)]
pub struct TintCache {
    entries: HashMap<ImageId, TintEntry>,
    builds: u64,
}

impl TintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies built so far (cache misses).
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evict(&mut self, id: ImageId) {
        self.entries.remove(&id);
    }

    /// Tinted copy of `src` (registered as `id`), rebuilt when stale.
    pub fn tinted(&mut self, id: ImageId, src: &PixelBuffer, tint: u32) -> &PixelBuffer {
        let revision = src.revision();
        let entry = match self.entries.entry(id) {
            Entry::Occupied(o) if o.get().tint == tint && o.get().revision == revision => o.into_mut(),
            slot => {
                self.builds += 1;
                log::debug!("tinted copy of {id:?} rebuilt");
                let fresh = TintEntry { tint, revision, image: apply_tint(src, tint) };
                match slot {
                    Entry::Occupied(mut o) => {
                        o.insert(fresh);
                        o.into_mut()
                    }
                    Entry::Vacant(v) => v.insert(fresh),
                }
            }
        };
        &entry.image
    }
}

/// Multiplies every channel by the tint. Alpha-only images take the tint
/// color with their coverage scaled by the tint alpha.
pub(crate) fn apply_tint(src: &PixelBuffer, tint: u32) -> PixelBuffer {
    let ta = tint >> 24;
    let format = if src.format() == PixelFormat::Rgb && ta == 0xFF { PixelFormat::Rgb } else { PixelFormat::Argb };
    let mul = |c: u32, t: u32| (c * (t + 1)) >> 8;
    let pixels = src
        .pixels()
        .iter()
        .map(|&stored| {
            let p = src.format().to_argb(stored);
            let a = mul(p >> 24, ta);
            let r = mul((p >> 16) & 0xFF, (tint >> 16) & 0xFF);
            let g = mul((p >> 8) & 0xFF, (tint >> 8) & 0xFF);
            let b = mul(p & 0xFF, tint & 0xFF);
            format.from_argb(a << 24 | r << 16 | g << 8 | b)
        })
        .collect();
    PixelBuffer::from_pixels(src.width(), src.height(), format, pixels)
        .unwrap_or_else(|_| PixelBuffer::new(src.width(), src.height(), format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(fill: u32) -> PixelBuffer {
        let mut b = PixelBuffer::new(2, 2, PixelFormat::Rgb);
        b.fill(fill);
        b
    }

    // ── arena ─────────────────────────────────────────────────────────────

    #[test]
    fn removed_handles_dangle() {
        let mut arena = ImageArena::new();
        let a = arena.insert(img(0xFF11_1111));
        assert!(arena.remove(a).is_some());
        let b = arena.insert(img(0xFF22_2222));
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(|i| i.get(0, 0)), Some(0xFF22_2222));
        assert_eq!(arena.len(), 1);
        assert!(arena.remove(a).is_none());
    }

    #[test]
    fn pair_mut_in_either_order() {
        let mut arena = ImageArena::new();
        let a = arena.insert(img(0xFF00_0001));
        let b = arena.insert(img(0xFF00_0002));
        let (s, d) = arena.pair_mut(b, a).unwrap();
        assert_eq!(s.get(0, 0), 0xFF00_0002);
        d.set(0, 0, 0xFF00_0003);
        assert_eq!(arena.get(a).unwrap().get(0, 0), 0xFF00_0003);
        assert!(arena.pair_mut(a, a).is_none());
    }

    // ── tint cache ────────────────────────────────────────────────────────

    #[test]
    fn tint_multiplies_channels() {
        let t = apply_tint(&img(0xFFFF_8000), 0x80FF_FFFF);
        assert_eq!(t.format(), PixelFormat::Argb);
        assert_eq!(t.get(0, 0), 0x80FF_8000);
        let white = apply_tint(&img(0xFFFF_FFFF), 0xFFFF_FFFF);
        assert_eq!(white.get(1, 1), 0xFFFF_FFFF);
    }

    #[test]
    fn cache_hits_until_tint_or_revision_changes() {
        let mut arena = ImageArena::new();
        let id = arena.insert(img(0xFF40_4040));
        let mut cache = TintCache::new();
        cache.tinted(id, arena.get(id).unwrap(), 0xFFFF_0000);
        cache.tinted(id, arena.get(id).unwrap(), 0xFFFF_0000);
        assert_eq!(cache.builds(), 1);
        cache.tinted(id, arena.get(id).unwrap(), 0xFF00_FF00);
        assert_eq!(cache.builds(), 2);
        arena.get_mut(id).unwrap().set(0, 0, 0xFFFF_FFFF);
        cache.tinted(id, arena.get(id).unwrap(), 0xFF00_FF00);
        assert_eq!(cache.builds(), 3);
        cache.evict(id);
        assert!(cache.is_empty());
    }
}
