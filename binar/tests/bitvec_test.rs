use binar::{BitVec, Bitwise, BitwiseMut, BitwisePair, BitwisePairMut};
use proptest::prelude::*;
use std::str::FromStr;

proptest! {
    #[test]
    fn from_iter(bits in prop::collection::vec(any::<bool>(), 0..2000)) {
        let bitvec = BitVec::from_iter(bits.clone());
        let actual: Vec<bool> = bitvec.iter().collect();
        assert_eq!(bits, actual);
        assert_eq!(bitvec.len(), bits.len());
    }

    #[test]
    fn index(bits in prop::collection::vec(any::<bool>(), 0..2000)) {
        let bitvec = BitVec::from_iter(bits.clone());
        for (index, expected) in bits.iter().enumerate() {
            assert_eq!(bitvec.index(index), *expected);
        }
    }

    #[test]
    fn weight(bits in arbitrary_bitvec(2000)) {
        let ones = bits.iter().filter(|bit| *bit);
        assert_eq!(ones.count(), bits.weight());
        assert_eq!(bits.parity(), bits.weight() % 2 == 1);
    }

    #[test]
    fn support(bits in arbitrary_bitvec(2000)) {
        let support: Vec<usize> = bits.support().collect();
        assert_eq!(support.len(), bits.weight());
        assert!(support.windows(2).all(|pair| pair[0] < pair[1]));
        for index in support {
            assert!(bits.index(index));
        }
    }

    #[test]
    fn assign(bits in prop::collection::vec(any::<bool>(), 0..10)) {
        let mut bitvec = BitVec::zeros(bits.len());
        for (index, bit) in bits.iter().enumerate() {
            bitvec.assign_index(index, *bit);
        }
        let actual: Vec<bool> = bitvec.iter().collect();
        assert_eq!(bits, actual);
    }

    #[test]
    fn bitxor_assign((left, right) in equal_length_bitvecs(2000)) {
        let mut xored = left.clone();
        xored ^= &right;
        for (index, result) in xored.iter().enumerate() {
            assert_eq!(result, left.index(index) ^ right.index(index));
        }
        assert_eq!(xored, &left ^ &right);
        assert_eq!(left.xor_weight(&right), xored.weight());
    }

    #[test]
    fn and_weight((left, right) in equal_length_bitvecs(2000)) {
        let expected = (0..left.len())
            .filter(|&i| left.index(i) && right.index(i))
            .count();
        assert_eq!(left.and_weight(&right), expected);
        assert_eq!(left.dot(&right), expected % 2 == 1);
        assert_eq!((&left & &right).weight(), expected);
    }

    #[test]
    fn or_weight((left, right) in equal_length_bitvecs(2000)) {
        let expected = (0..left.len())
            .filter(|&i| left.index(i) || right.index(i))
            .count();
        assert_eq!(left.or_weight(&right), expected);
        let mut ored = left.clone();
        ored.bitor_assign(&right);
        assert_eq!(ored.weight(), expected);
    }

    #[test]
    fn concatenated(low in arbitrary_bitvec(150), high in arbitrary_bitvec(150)) {
        let joined = BitVec::concatenated(&low, &high);
        assert_eq!(joined.len(), low.len() + high.len());
        assert_eq!(joined.extract(0, low.len()), low.clone());
        assert_eq!(joined.extract(low.len(), joined.len()), high);
        assert_eq!(joined.weight(), low.weight() + high.weight());
    }

    #[test]
    fn scatter_then_select(bits in arbitrary_bitvec(64)) {
        let positions: Vec<usize> = (0..bits.len()).map(|index| 2 * index + 1).collect();
        let spread = bits.scattered(&positions, 2 * bits.len() + 1);
        assert_eq!(spread.weight(), bits.weight());
        assert_eq!(spread.selected(&positions), bits);
    }

    #[test]
    fn string_roundtrip(bits in arbitrary_bitvec(300)) {
        assert_eq!(BitVec::from_str(&bits.to_string()), Ok(bits));
    }
}

#[test]
fn words_roundtrip() {
    let bits = BitVec::from_word(5, 0b1_0110_1101);
    assert_eq!(bits.to_string(), "10110");
    assert_eq!(bits.low_word(), 0b0_1101);
    assert_eq!(BitVec::from_words(3, &[]), BitVec::zeros(3));
}

#[test]
fn rejects_foreign_characters() {
    assert!(BitVec::from_str("01a").is_err());
}

prop_compose! {
    fn arbitrary_bitvec(max_length: usize)(bits in prop::collection::vec(any::<bool>(), 0..max_length)) -> BitVec {
        BitVec::from_iter(bits)
    }
}

prop_compose! {
    fn equal_length_bitvecs(max_length: usize)(length in 0..max_length)(
        left in prop::collection::vec(any::<bool>(), length),
        right in prop::collection::vec(any::<bool>(), length),
    ) -> (BitVec, BitVec) {
        (BitVec::from_iter(left), BitVec::from_iter(right))
    }
}
