use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Zig-zag traversal of the symbol in two column strips, right to left, skipping the
/// vertical timing column. Yields every cell of a strip, function cells included, as
/// (row, column).
pub struct EncRegionIter {
    // Right column of the current strip
    right: i16,
    // Steps taken along the strip
    vert: i16,
    // Column within the strip, 0 for right and 1 for left
    j: i16,
    w: i16,
}

impl EncRegionIter {
    pub const fn new(ver: Version) -> Self {
        let w = ver.width() as i16;
        Self { right: w - 1, vert: 0, j: 0, w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let c = self.right - self.j;
        let upward = (self.right + 1) & 2 == 0;
        let r = if upward { self.w - 1 - self.vert } else { self.vert };

        self.j += 1;
        if self.j == 2 {
            self.j = 0;
            self.vert += 1;
            if self.vert == self.w {
                self.vert = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
            }
        }
        Some((r, c))
    }
}
