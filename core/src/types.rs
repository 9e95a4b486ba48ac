/// Single board axis used for row and column counts.
pub type Dim = u8;

/// Count type used for card totals and pair totals.
pub type CardCount = u16;

/// Position of a card in the dealt sequence, row-major.
pub type CardIndex = CardCount;

/// Points earned in a session, one per matched pair.
pub type Score = u32;

/// Identifier bumped whenever a session is started or discarded.
pub type Generation = u64;

/// Two-dimensional position `(row, col)`.
pub type Pos2 = (Dim, Dim);

pub const fn mult(a: Dim, b: Dim) -> CardCount {
    let a = a as CardCount;
    let b = b as CardCount;
    a.saturating_mul(b)
}

pub trait ToUsizeIndex {
    fn to_usize_index(self) -> usize;
}

impl ToUsizeIndex for CardIndex {
    fn to_usize_index(self) -> usize {
        self.into()
    }
}
