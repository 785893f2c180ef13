use crate::board::Move;

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;

        while j < 8 {
            c = if (c & 1) != 0 {
                0xEDB8_8320u32 ^ (c >> 1)
            } else {
                c >> 1
            };
            j += 1;
        }

        table[i] = c;
        i += 1;
    }

    table
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;

    for byte in data {
        let idx = ((crc ^ (*byte as u32)) & 0xFF) as usize;
        crc = CRC_TABLE[idx] ^ (crc >> 8);
    }

    crc ^ 0xFFFF_FFFFu32
}

const MOVE_BYTE_STAY: u8 = 0xFF;

/// Cardinal index (east, south, west, north); anything else encodes as 0xFF.
pub fn encode_move(mv: Move) -> u8 {
    Move::CARDINALS
        .iter()
        .position(|cardinal| *cardinal == mv)
        .map(|idx| idx as u8)
        .unwrap_or(MOVE_BYTE_STAY)
}

pub fn moves_digest(moves: &[Move]) -> u32 {
    let encoded: Vec<u8> = moves.iter().copied().map(encode_move).collect();
    crc32(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_matches_the_reference_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn move_encoding_is_the_cardinal_index() {
        assert_eq!(encode_move(Move::RIGHT), 0);
        assert_eq!(encode_move(Move::UP), 3);
        assert_eq!(encode_move(Move::STAY), 0xFF);
        assert_ne!(
            moves_digest(&[Move::RIGHT, Move::DOWN]),
            moves_digest(&[Move::DOWN, Move::RIGHT])
        );
    }
}
