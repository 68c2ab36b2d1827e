use crate::{Bitwise, BitwiseMut, BitwisePair, BitwisePairMut};
use sorted_iter::assume::AssumeSortedByItemExt;
use std::fmt::{Debug, Display};
use std::ops::{BitAnd, BitXor, BitXorAssign};
use std::str::FromStr;

pub type Word = u64;
const WORD_BITS: usize = Word::BITS as usize;

/// A dynamically-sized bit vector packed into 64-bit words.
///
/// Bits past `len()` in the last word are kept at zero, so equality and hashing
/// only depend on the logical content.
///
/// # Examples
///
/// ```
/// use binar::{BitVec, Bitwise, BitwiseMut};
///
/// let mut bits = BitVec::zeros(70);
/// bits.assign_index(3, true);
/// bits.assign_index(65, true);
/// assert_eq!(bits.weight(), 2);
/// assert_eq!(bits.support().collect::<Vec<_>>(), vec![3, 65]);
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitVec {
    words: Vec<Word>,
    bit_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitVecParsingError;

impl Display for BitVecParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bit strings may only contain '0' and '1'")
    }
}

impl std::error::Error for BitVecParsingError {}

#[inline]
fn word_count(bit_length: usize) -> usize {
    bit_length.div_ceil(WORD_BITS)
}

impl BitVec {
    /// Creates a bit vector of `length` zeros.
    pub fn zeros(length: usize) -> Self {
        BitVec {
            words: vec![0; word_count(length)],
            bit_length: length,
        }
    }

    /// Creates a bit vector of `length` ones.
    pub fn ones(length: usize) -> Self {
        let mut res = BitVec {
            words: vec![Word::MAX; word_count(length)],
            bit_length: length,
        };
        res.clear_tail();
        res
    }

    /// Builds a bit vector of `length` bits from packed words, least significant bit first.
    /// Words beyond the needed count are ignored and missing words are treated as zero.
    pub fn from_words(length: usize, words: &[Word]) -> Self {
        let mut res = BitVec::zeros(length);
        for (target, source) in res.words.iter_mut().zip(words) {
            *target = *source;
        }
        res.clear_tail();
        res
    }

    /// Bit vector of `length` bits whose bit `j` is bit `j` of `word`.
    pub fn from_word(length: usize, word: Word) -> Self {
        BitVec::from_words(length, &[word])
    }

    #[must_use]
    pub fn as_words(&self) -> &[Word] {
        &self.words
    }

    /// The first 64 bits packed into a word.
    #[must_use]
    pub fn low_word(&self) -> Word {
        self.words.first().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bit_length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bit_length == 0
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.bit_length).map(|index| self.index(index))
    }

    /// Changes the length, dropping bits past `new_length` or padding with zeros.
    pub fn resize(&mut self, new_length: usize) {
        self.words.resize(word_count(new_length), 0);
        self.bit_length = new_length;
        self.clear_tail();
    }

    /// Bits `start..stop` as a new vector.
    ///
    /// # Panics
    ///
    /// Panics if `start > stop` or `stop > self.len()`.
    pub fn extract(&self, start: usize, stop: usize) -> BitVec {
        assert!(start <= stop && stop <= self.bit_length);
        let mut res = BitVec::zeros(stop - start);
        for index in self.support().filter(|index| (start..stop).contains(index)) {
            res.assign_index(index - start, true);
        }
        res
    }

    /// Bits at the given positions, in the order given.
    pub fn selected(&self, indexes: &[usize]) -> BitVec {
        indexes.iter().map(|&index| self.index(index)).collect()
    }

    /// Places `low` at positions `0..low.len()` and `high` right after it.
    pub fn concatenated(low: &BitVec, high: &BitVec) -> BitVec {
        let mut res = low.clone();
        res.resize(low.len() + high.len());
        for index in high.support() {
            res.assign_index(low.len() + index, true);
        }
        res
    }

    /// Scatters the bits of `self` into a zero vector of `length` bits: bit `k` lands on `positions[k]`.
    ///
    /// # Panics
    ///
    /// Panics if `positions.len() != self.len()` or a position is out of range.
    pub fn scattered(&self, positions: &[usize], length: usize) -> BitVec {
        assert_eq!(positions.len(), self.bit_length);
        let mut res = BitVec::zeros(length);
        for index in self.support() {
            res.assign_index(positions[index], true);
        }
        res
    }

    fn clear_tail(&mut self) {
        let remainder = self.bit_length % WORD_BITS;
        if remainder != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= ((1 as Word) << remainder) - 1;
            }
        }
    }
}

/// Iterator over the positions of set bits, in increasing order.
pub struct Support<'life> {
    words: &'life [Word],
    word_index: usize,
    current: Word,
}

impl<'life> Support<'life> {
    fn new(words: &'life [Word]) -> Self {
        Support {
            words,
            word_index: 0,
            current: words.first().copied().unwrap_or(0),
        }
    }
}

impl Iterator for Support<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            if self.word_index + 1 >= self.words.len() {
                return None;
            }
            self.word_index += 1;
            self.current = self.words[self.word_index];
        }
    }
}

impl Bitwise for BitVec {
    #[inline]
    fn index(&self, index: usize) -> bool {
        debug_assert!(index < self.bit_length, "bit {index} out of range {}", self.bit_length);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    fn support(&self) -> impl sorted_iter::SortedIterator<Item = usize> {
        Support::new(&self.words).assume_sorted_by_item()
    }

    #[inline]
    fn weight(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[inline]
    fn parity(&self) -> bool {
        self.words.iter().fold(0 as Word, |acc, word| acc ^ *word).count_ones() % 2 == 1
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }
}

impl BitwiseMut for BitVec {
    #[inline]
    fn assign_index(&mut self, index: usize, to: bool) {
        debug_assert!(index < self.bit_length, "bit {index} out of range {}", self.bit_length);
        let mask: Word = 1 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if to {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    #[inline]
    fn negate_index(&mut self, index: usize) {
        debug_assert!(index < self.bit_length, "bit {index} out of range {}", self.bit_length);
        self.words[index / WORD_BITS] ^= (1 as Word) << (index % WORD_BITS);
    }

    fn clear_bits(&mut self) {
        self.words.fill(0);
    }
}

impl BitwisePair for BitVec {
    #[inline]
    fn dot(&self, other: &BitVec) -> bool {
        self.and_weight(other) % 2 == 1
    }

    #[inline]
    fn and_weight(&self, other: &BitVec) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(left, right)| (left & right).count_ones() as usize)
            .sum()
    }

    #[inline]
    fn or_weight(&self, other: &BitVec) -> usize {
        let (longer, shorter) = if self.words.len() >= other.words.len() { (self, other) } else { (other, self) };
        longer
            .words
            .iter()
            .enumerate()
            .map(|(index, word)| (word | shorter.words.get(index).copied().unwrap_or(0)).count_ones() as usize)
            .sum()
    }

    #[inline]
    fn xor_weight(&self, other: &BitVec) -> usize {
        let (longer, shorter) = if self.words.len() >= other.words.len() { (self, other) } else { (other, self) };
        longer
            .words
            .iter()
            .enumerate()
            .map(|(index, word)| (word ^ shorter.words.get(index).copied().unwrap_or(0)).count_ones() as usize)
            .sum()
    }
}

impl BitwisePairMut for BitVec {
    fn assign(&mut self, other: &BitVec) {
        assert_eq!(self.bit_length, other.bit_length);
        self.words.copy_from_slice(&other.words);
    }

    fn bitand_assign(&mut self, other: &BitVec) {
        assert_eq!(self.bit_length, other.bit_length);
        for (left, right) in self.words.iter_mut().zip(&other.words) {
            *left &= right;
        }
    }

    fn bitor_assign(&mut self, other: &BitVec) {
        assert_eq!(self.bit_length, other.bit_length);
        for (left, right) in self.words.iter_mut().zip(&other.words) {
            *left |= right;
        }
    }

    fn bitxor_assign(&mut self, other: &BitVec) {
        assert_eq!(self.bit_length, other.bit_length);
        for (left, right) in self.words.iter_mut().zip(&other.words) {
            *left ^= right;
        }
    }
}

impl BitXor for &BitVec {
    type Output = BitVec;

    fn bitxor(self, rhs: &BitVec) -> BitVec {
        let mut res = self.clone();
        BitwisePairMut::bitxor_assign(&mut res, rhs);
        res
    }
}

impl BitXorAssign<&BitVec> for BitVec {
    fn bitxor_assign(&mut self, rhs: &BitVec) {
        BitwisePairMut::bitxor_assign(self, rhs);
    }
}

impl BitAnd for &BitVec {
    type Output = BitVec;

    fn bitand(self, rhs: &BitVec) -> BitVec {
        let mut res = self.clone();
        BitwisePairMut::bitand_assign(&mut res, rhs);
        res
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut words = Vec::new();
        let mut bit_length = 0;
        for bit in iter {
            if bit_length % WORD_BITS == 0 {
                words.push(0 as Word);
            }
            if bit {
                if let Some(last) = words.last_mut() {
                    *last |= (1 as Word) << (bit_length % WORD_BITS);
                }
            }
            bit_length += 1;
        }
        BitVec { words, bit_length }
    }
}

impl FromStr for BitVec {
    type Err = BitVecParsingError;

    /// Parses a string of `0`/`1` characters, first character at index 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|character| match character {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(BitVecParsingError),
            })
            .collect()
    }
}

impl Display for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitVec[{self}]")
    }
}
