/// Code used for anything we cannot resolve to a nucleotide, including positions off the template.
pub const UNKNOWN: u8 = 0;
/// Code for A
pub const A: u8 = 1;
/// Code for C
pub const C: u8 = 2;
/// Code for G
pub const G: u8 = 3;
/// Code for T
pub const T: u8 = 4;

/// Upper-case symbols indexed by code
const CODE_TO_UPPER: [u8; 5] = *b"NACGT";
/// Lower-case symbols indexed by code
const CODE_TO_LOWER: [u8; 5] = *b"nacgt";

/// ASCII to code table; anything that is not ACGT (either case) maps to UNKNOWN
const ASCII_TO_CODE: [u8; 256] = {
    let mut table = [UNKNOWN; 256];
    table[b'A' as usize] = A;
    table[b'a' as usize] = A;
    table[b'C' as usize] = C;
    table[b'c' as usize] = C;
    table[b'G' as usize] = G;
    table[b'g' as usize] = G;
    table[b'T' as usize] = T;
    table[b't' as usize] = T;
    table
};

/// Converts a single ASCII base into its code.
pub fn encode_base(symbol: u8) -> u8 {
    ASCII_TO_CODE[symbol as usize]
}

/// Converts an ASCII sequence into base codes.
/// # Arguments
/// * `sequence` - the ASCII sequence, case-insensitive
pub fn encode(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().map(|&s| encode_base(s)).collect()
}

/// Converts a base code back to an upper-case ASCII symbol; unexpected codes become 'N'.
pub fn decode_base(code: u8) -> u8 {
    CODE_TO_UPPER.get(code as usize).copied().unwrap_or(b'N')
}

/// Same as `decode_base`, but lower-case.
pub fn decode_base_lower(code: u8) -> u8 {
    CODE_TO_LOWER.get(code as usize).copied().unwrap_or(b'n')
}

/// Converts a sequence of codes into an upper-case String.
pub fn decode(codes: &[u8]) -> String {
    codes.iter().map(|&c| decode_base(c) as char).collect()
}
