//! Wire framing for MAX30003 register transactions.
//!
//! Every transaction is a fixed 4-byte frame: a command byte carrying the
//! 7-bit register address and the read/write bit, followed by a 24-bit
//! big-endian payload. Reads send zeros after the command and receive the
//! payload back in bytes 1..=3; byte 0 of the reply echoes nothing useful.

/// Length in bytes of every SPI frame exchanged with the device.
pub const FRAME_LEN: usize = 4;

/// Mask selecting the 24 payload bits of a register value.
pub const VALUE_MASK: u32 = 0x00FF_FFFF;

/// Builds the command byte used to address registers over SPI.
pub const fn command_byte(register: u8, is_read: bool) -> u8 {
    let command = (register & 0x7F) << 1;
    if is_read { command | 0x01 } else { command }
}

/// Encodes a register write. Bits above 23 of `value` are dropped.
pub const fn encode_write_frame(register: u8, value: u32) -> [u8; FRAME_LEN] {
    let [_, high, mid, low] = value.to_be_bytes();
    [command_byte(register, false), high, mid, low]
}

/// Encodes the transmit half of a register read.
pub const fn encode_read_frame(register: u8) -> [u8; FRAME_LEN] {
    [command_byte(register, true), 0, 0, 0]
}

/// Reassembles the 24-bit payload of a received frame, ignoring the command slot.
pub const fn decode_read_frame(frame: &[u8; FRAME_LEN]) -> u32 {
    u32::from_be_bytes([0, frame[1], frame[2], frame[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_commands_set_bit_zero_and_writes_clear_it() {
        for address in 0..=0x7F_u8 {
            assert_eq!(command_byte(address, true) & 1, 1);
            assert_eq!(command_byte(address, false) & 1, 0);
            assert_eq!(command_byte(address, true) >> 1, address);
        }
    }

    #[test]
    fn command_byte_matches_known_fifo_commands() {
        assert_eq!(command_byte(0x21, true), 0x43);
        assert_eq!(command_byte(0x20, true), 0x41);
        assert_eq!(command_byte(0x0A, false), 0x14);
    }

    #[test]
    fn write_frame_is_command_then_big_endian_payload() {
        assert_eq!(encode_write_frame(0x15, 0x82_5000), [0x2A, 0x82, 0x50, 0x00]);
    }

    #[test]
    fn write_frame_drops_bits_above_24() {
        assert_eq!(encode_write_frame(0x02, 0xFFC0_0003), [0x04, 0xC0, 0x00, 0x03]);
    }

    #[test]
    fn read_frame_pads_with_zeros() {
        assert_eq!(encode_read_frame(0x01), [0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn decode_discards_echoed_command_byte() {
        assert_eq!(decode_read_frame(&[0xFF, 0x12, 0x34, 0x56]), 0x12_3456);
    }

    #[test]
    fn payload_bytes_survive_write_then_decode() {
        for value in [0, 1, 0x80_0000, 0x12_3456, 0xAB_CDEF, VALUE_MASK] {
            let frame = encode_write_frame(0x10, value);
            assert_eq!(decode_read_frame(&frame), value);
            assert_eq!(&frame[1..], &value.to_be_bytes()[1..]);
        }
    }
}
