use serde::{Deserialize, Serialize};

/// One bit for each voxel of a leaf node.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bitset512 {
    words: [u64; 8],
}

impl Bitset512 {
    pub const NUM_BITS: usize = 512;

    #[inline]
    pub const fn all_unset() -> Self {
        Self { words: [0; 8] }
    }

    #[inline]
    pub const fn all_set() -> Self {
        Self {
            words: [u64::MAX; 8],
        }
    }

    #[inline]
    pub fn bit_is_set(&self, bit: usize) -> bool {
        self.words[bit >> 6] & (1 << (bit & 63)) != 0
    }

    #[inline]
    pub fn set_bit(&mut self, bit: usize) {
        self.words[bit >> 6] |= 1 << (bit & 63);
    }

    #[inline]
    pub fn unset_bit(&mut self, bit: usize) {
        self.words[bit >> 6] &= !(1 << (bit & 63));
    }

    #[inline]
    pub fn assign_bit(&mut self, bit: usize, value: bool) {
        if value {
            self.set_bit(bit)
        } else {
            self.unset_bit(bit)
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.words.iter().any(|w| *w != 0)
    }

    #[inline]
    pub fn all(&self) -> bool {
        self.words.iter().all(|w| *w == u64::MAX)
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Iterates over the indices of all set bits in increasing order.
    pub fn iter_set_bits(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;

                Some(i * 64 + bit)
            })
        })
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_bits_are_iterated_in_order() {
        let mut bits = Bitset512::all_unset();
        for &b in [511, 0, 63, 64, 200].iter() {
            bits.set_bit(b);
        }
        bits.unset_bit(200);

        assert_eq!(bits.iter_set_bits().collect::<Vec<_>>(), vec![0, 63, 64, 511]);
        assert_eq!(bits.count_ones(), 4);
        assert!(bits.any() && !bits.all());
        assert!(Bitset512::all_set().all());
    }
}
