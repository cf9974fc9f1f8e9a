/// Axis-aligned integer rectangle in pixel space (top-left origin).
///
/// Width and height may be negative before [`normalized`](Self::normalized);
/// every consumer in the compositor normalizes and clips first.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a whole `width × height` image.
    #[inline]
    pub fn of_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    #[inline]
    pub fn right(self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    #[inline]
    pub fn area(self) -> usize {
        if self.is_empty() { 0 } else { self.w as usize * self.h as usize }
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.w < 0 {
            r.x += r.w;
            r.w = -r.w;
        }
        if r.h < 0 {
            r.y += r.h;
            r.h = -r.h;
        }
        r
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, x: i32, y: i32) -> bool {
        let r = self.normalized();
        x >= r.x && y >= r.y && x < r.right() && y < r.bottom()
    }

    #[inline]
    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Smallest rectangle covering both. Empty inputs are ignored.
    #[inline]
    pub fn union(self, other: PixelRect) -> PixelRect {
        let a = self.normalized();
        let b = other.normalized();
        if a.is_empty() {
            return b;
        }
        if b.is_empty() {
            return a;
        }
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        let x1 = a.right().max(b.right());
        let y1 = a.bottom().max(b.bottom());
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Clips to a `width × height` image; `None` when nothing remains.
    #[inline]
    pub fn clip_to(self, width: usize, height: usize) -> Option<PixelRect> {
        self.intersect(PixelRect::of_size(width, height))
    }

    #[inline]
    pub fn overlaps(self, other: PixelRect) -> bool {
        self.intersect(other).is_some()
    }
}
