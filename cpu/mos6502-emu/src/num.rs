pub(crate) trait GetBit: Copy {
    #[must_use]
    fn bit(self, i: u8) -> bool;
}

macro_rules! impl_get_bit {
    ($t:ty) => {
        impl GetBit for $t {
            #[inline]
            fn bit(self, i: u8) -> bool {
                debug_assert!(i < (<$t>::BITS as u8));
                self & (1 << i) != 0
            }
        }
    };
}

impl_get_bit!(u8);
impl_get_bit!(u16);

pub(crate) trait U16Ext: Copy {
    fn lsb(self) -> u8;

    fn msb(self) -> u8;

    /// Whether `self` and `other` lie in different 256-byte pages.
    fn crosses_page(self, other: u16) -> bool;
}

impl U16Ext for u16 {
    #[inline(always)]
    fn lsb(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    fn msb(self) -> u8 {
        (self >> 8) as u8
    }

    #[inline(always)]
    fn crosses_page(self, other: u16) -> bool {
        self & 0xFF00 != other & 0xFF00
    }
}
