pub mod bit;
pub use bit::{Bitwise, BitwiseMut, BitwisePair, BitwisePairMut};

pub mod vec;
pub use vec::{BitVec, Word};

pub mod matrix;
pub use matrix::BitMatrix;

pub const WORD_BIT_LEN: usize = Word::BITS as usize;
