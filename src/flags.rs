//! Pure flag-computation functions. No component keeps hidden state here:
//! every function takes the prior FLAGS value and the operands, and returns
//! the new FLAGS value for the CPU to commit.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u16 {
        const CF = 1 << 0;
        const RESERVED1 = 1 << 1;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const TF = 1 << 8;
        const IF = 1 << 9;
        const DF = 1 << 10;
        const OF = 1 << 11;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::RESERVED1
    }
}

impl Flags {
    /// ORs the always-on reserved bit back in. Every path that assembles a
    /// FLAGS value from raw bits (POPF, IRET, reset) must route through this.
    pub fn sanitized(bits: u16) -> Flags {
        Flags::from_bits_truncate(bits) | Flags::RESERVED1
    }
}

const fn even_parity(byte: u8) -> bool {
    let mut b = byte;
    b ^= b >> 4;
    b ^= b >> 2;
    b ^= b >> 1;
    (b & 1) == 0
}

const fn build_parity_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = even_parity(i as u8);
        i += 1;
    }
    table
}

/// Even-parity lookup over a byte, indexed directly by its value.
pub const PARITY_EVEN: [bool; 256] = build_parity_table();

pub fn update_zs8(flags: Flags, result: u8) -> Flags {
    let mut f = flags;
    f.set(Flags::ZF, result == 0);
    f.set(Flags::SF, result & 0x80 != 0);
    f.set(Flags::PF, PARITY_EVEN[result as usize]);
    f
}

pub fn update_zs16(flags: Flags, result: u16) -> Flags {
    let mut f = flags;
    f.set(Flags::ZF, result == 0);
    f.set(Flags::SF, result & 0x8000 != 0);
    f.set(Flags::PF, PARITY_EVEN[(result & 0xFF) as usize]);
    f
}

/// `r_wide` is the widened unsigned sum `op1 + op2`; the caller computes it
/// and also uses it (truncated) as the committed result.
pub fn update_add8(flags: Flags, op1: u8, op2: u8, r_wide: u16) -> Flags {
    let r8 = r_wide as u8;
    let cf = r_wide > 0xFF;
    let of = ((op1 ^ r8) & (op2 ^ r8) & 0x80) != 0;
    let af = ((op1 ^ op2 ^ r8) & 0x10) != 0;
    let mut f = update_zs8(flags, r8);
    f.set(Flags::CF, cf);
    f.set(Flags::OF, of);
    f.set(Flags::AF, af);
    f
}

pub fn update_add16(flags: Flags, op1: u16, op2: u16, r_wide: u32) -> Flags {
    let r16 = r_wide as u16;
    let cf = r_wide > 0xFFFF;
    let of = ((op1 ^ r16) & (op2 ^ r16) & 0x8000) != 0;
    let af = ((op1 ^ op2 ^ r16) & 0x10) != 0;
    let mut f = update_zs16(flags, r16);
    f.set(Flags::CF, cf);
    f.set(Flags::OF, of);
    f.set(Flags::AF, af);
    f
}

/// `r_wide` is `op1` minus `op2` computed in a widened unsigned domain, so
/// that a borrow out of the top bit is still observable after truncation.
pub fn update_sub8(flags: Flags, op1: u8, op2: u8, r_wide: u16) -> Flags {
    let r8 = r_wide as u8;
    let cf = op1 < op2;
    let of = ((op1 ^ op2) & (op1 ^ r8) & 0x80) != 0;
    let af = ((op1 ^ op2 ^ r8) & 0x10) != 0;
    let mut f = update_zs8(flags, r8);
    f.set(Flags::CF, cf);
    f.set(Flags::OF, of);
    f.set(Flags::AF, af);
    f
}

pub fn update_sub16(flags: Flags, op1: u16, op2: u16, r_wide: u32) -> Flags {
    let r16 = r_wide as u16;
    let cf = op1 < op2;
    let of = ((op1 ^ op2) & (op1 ^ r16) & 0x8000) != 0;
    let af = ((op1 ^ op2 ^ r16) & 0x10) != 0;
    let mut f = update_zs16(flags, r16);
    f.set(Flags::CF, cf);
    f.set(Flags::OF, of);
    f.set(Flags::AF, af);
    f
}

/// CF and OF are cleared; AF is left untouched (architecturally undefined).
pub fn update_logic8(flags: Flags, result: u8) -> Flags {
    let mut f = update_zs8(flags, result);
    f.set(Flags::CF, false);
    f.set(Flags::OF, false);
    f
}

pub fn update_logic16(flags: Flags, result: u16) -> Flags {
    let mut f = update_zs16(flags, result);
    f.set(Flags::CF, false);
    f.set(Flags::OF, false);
    f
}
