//! Offset arithmetic: doubling in GF(2^n), bit windows and the L table.
use alloc::{vec, vec::Vec};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Reduction constants for one block size.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Field {
    /// Low bits of the reduction polynomial, folded into the last three
    /// bytes when doubling overflows.
    residue: u32,
    /// Stretch shift in bits.
    pub(crate) shift: usize,
    /// Bits of the last two nonce bytes which form `bottom`.
    pub(crate) mask: [u8; 2],
}

impl Field {
    pub(crate) const GF128: Self = Self {
        residue: 135,
        shift: 8,
        mask: [0x00, 0x3F],
    };

    pub(crate) const GF256: Self = Self {
        residue: 1061,
        shift: 1,
        mask: [0x00, 0xFF],
    };

    pub(crate) fn for_block_size(bs: usize) -> Option<Self> {
        match bs {
            16 => Some(Self::GF128),
            32 => Some(Self::GF256),
            _ => None,
        }
    }

    /// Multiply `block` by `x` in place.
    pub(crate) fn double(&self, block: &mut [u8]) {
        let n = block.len();
        let carry = 0u8.wrapping_sub(block[0] >> 7);
        for i in 0..n - 1 {
            block[i] = (block[i] << 1) | (block[i + 1] >> 7);
        }
        block[n - 1] <<= 1;

        let residue = self.residue.to_be_bytes();
        for (b, r) in block[n - 3..].iter_mut().zip(&residue[1..]) {
            *b ^= r & carry;
        }
    }
}

/// Copy `out.len()` bytes of `src` starting `offset` bits in.
///
/// Bits past the end of `src` read as zero.
pub(crate) fn bit_window(src: &[u8], offset: usize, out: &mut [u8]) {
    let at = |i: usize| src.get(i).copied().unwrap_or(0);
    let (bytes, bits) = (offset / 8, offset % 8);
    for (i, o) in out.iter_mut().enumerate() {
        *o = at(bytes + i) << bits;
        if bits != 0 {
            *o |= at(bytes + i + 1) >> (8 - bits);
        }
    }
}

/// `L[i] = double^(i+2)(L*)`, grown on demand.
#[derive(Clone, Debug, Default)]
pub(crate) struct LTable {
    entries: Vec<Vec<u8>>,
}

impl LTable {
    pub(crate) fn new(l0: Vec<u8>) -> Self {
        Self { entries: vec![l0] }
    }

    pub(crate) fn get(&mut self, field: &Field, i: usize) -> &[u8] {
        while self.entries.len() <= i {
            let mut next = self.entries[self.entries.len() - 1].clone();
            field.double(&mut next);
            self.entries.push(next);
        }
        &self.entries[i]
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for LTable {
    fn zeroize(&mut self) {
        self.entries.zeroize();
    }
}

/// Step a block counter and fold `L[ntz(index)]` into `offset`.
pub(crate) fn advance(field: &Field, table: &mut LTable, index: &mut u64, offset: &mut [u8]) {
    *index += 1;
    let l = table.get(field, index.trailing_zeros() as usize);
    buffered_cipher::xor(offset, l);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn double_without_carry() {
        let mut block = hex!("40000000000000000000000000000001");
        Field::GF128.double(&mut block);
        assert_eq!(block, hex!("80000000000000000000000000000002"));
    }

    #[test]
    fn double_reduces_gf128() {
        let mut block = hex!("80000000000000000000000000000000");
        Field::GF128.double(&mut block);
        assert_eq!(block, hex!("00000000000000000000000000000087"));
    }

    #[test]
    fn double_reduces_gf256() {
        let mut block = [0u8; 32];
        block[0] = 0x80;
        Field::GF256.double(&mut block);
        let mut expected = [0u8; 32];
        expected[30] = 0x04;
        expected[31] = 0x25;
        assert_eq!(block, expected);
    }

    #[test]
    fn window_crosses_bytes() {
        let src = hex!("F00F");
        let mut out = [0u8; 2];
        bit_window(&src, 4, &mut out);
        assert_eq!(out, hex!("00F0"));
        bit_window(&src, 8, &mut out);
        assert_eq!(out, hex!("0F00"));
        bit_window(&src, 0, &mut out);
        assert_eq!(out, src);
    }

    #[test]
    fn table_grows_by_trailing_zeros() {
        let mut table = LTable::new(vec![1; 16]);
        let mut offset = [0u8; 16];
        let mut index = 0;
        for _ in 0..7 {
            advance(&Field::GF128, &mut table, &mut index, &mut offset);
        }
        assert_eq!(table.len(), 3);
        advance(&Field::GF128, &mut table, &mut index, &mut offset);
        assert_eq!(index, 8);
        assert_eq!(table.len(), 4);
    }
}
