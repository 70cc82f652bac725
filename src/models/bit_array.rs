/// Compact bit row: one scanned line reduced to black (`true`) and white modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    size: usize,
    data: Vec<u8>,
}

impl BitArray {
    /// Create an all-white row of `size` bits
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size.div_ceil(8)],
        }
    }

    /// Build a row from a slice of booleans (true = black)
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut row = Self::new(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                row.set(i, true);
            }
        }
        row
    }

    /// Number of bits in the row
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when the row holds no bits
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get bit at `i`; out-of-range reads are white
    pub fn get(&self, i: usize) -> bool {
        if i >= self.size {
            return false;
        }
        (self.data[i / 8] >> (i % 8)) & 1 == 1
    }

    /// Set bit at `i`
    pub fn set(&mut self, i: usize, value: bool) {
        if i >= self.size {
            return;
        }
        if value {
            self.data[i / 8] |= 1 << (i % 8);
        } else {
            self.data[i / 8] &= !(1 << (i % 8));
        }
    }

    /// Set every bit in `start..end` to `value`
    pub fn set_range(&mut self, start: usize, end: usize, value: bool) {
        for i in start..end.min(self.size) {
            self.set(i, value);
        }
    }

    /// Clear all bits to white
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Index of the first black bit at or after `from`, or `len()` if none
    pub fn next_set(&self, from: usize) -> usize {
        (from..self.size).find(|&i| self.get(i)).unwrap_or(self.size)
    }

    /// Index of the first white bit at or after `from`, or `len()` if none
    pub fn next_unset(&self, from: usize) -> usize {
        (from..self.size).find(|&i| !self.get(i)).unwrap_or(self.size)
    }

    /// Check that every bit in `start..end` equals `value`.
    ///
    /// An empty range is trivially uniform; a range reaching past the end of
    /// the row is not.
    pub fn is_range(&self, start: usize, end: usize, value: bool) -> bool {
        if end < start || end > self.size {
            return false;
        }
        (start..end).all(|i| self.get(i) == value)
    }

    /// Copy of this row read right to left
    pub fn reversed(&self) -> Self {
        let mut out = Self::new(self.size);
        self.reverse_into(&mut out);
        out
    }

    /// Write this row, read right to left, into `out` (resized as needed)
    pub fn reverse_into(&self, out: &mut BitArray) {
        if out.size != self.size {
            *out = Self::new(self.size);
        } else {
            out.clear();
        }
        for i in 0..self.size {
            if self.get(i) {
                out.set(self.size - 1 - i, true);
            }
        }
    }
}

impl Default for BitArray {
    fn default() -> Self {
        Self::new(0)
    }
}
