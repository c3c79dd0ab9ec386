//! Panel command protocol definitions and frame encoding.
//!
//! Protocol structure:
//! - Frame packet: 100 bytes (3 header bytes + 96 RGB data bytes + terminator)
//! - Header: initiator 0xBC, picture-mode byte 0x0F, 1-based block number
//! - A full frame is 8 packets of 32 pixels each, sent in ascending block order
//!
//! The protocol carries no checksum or acknowledgment; the panel renders
//! whatever arrives, so callers must deliver packets strictly in order.

use crate::error::{Error, Result};
use crate::pixel::{Pixel, PixelGrid};

/// Command initiator byte.
pub const COMMAND_INITIATOR: u8 = 0xBC;

/// Picture-mode protocol byte.
pub const PICTURE_MODE: u8 = 0x0F;

/// Command terminator byte.
pub const TERMINATOR: u8 = 0x55;

/// Pixels carried per frame packet.
pub const PIXELS_PER_BLOCK: usize = 32;

/// Number of blocks in a full frame.
pub const BLOCK_COUNT: usize = 8;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 3;

/// Total packet size: header + 32 RGB pixels + terminator.
pub const PACKET_SIZE: usize = HEADER_SIZE + PIXELS_PER_BLOCK * 3 + 1;

/// Pixel count of a full frame.
pub const FRAME_PIXELS: usize = PIXELS_PER_BLOCK * BLOCK_COUNT;

/// Mode-select command that puts the panel into picture mode.
///
/// Must be written before any frame packets are accepted.
pub const PICTURE_MODE_COMMAND: [u8; 6] =
    [COMMAND_INITIATOR, PICTURE_MODE, 0xF1, 0x08, 0x08, TERMINATOR];

/// A single frame packet on the wire.
pub type CommandPacket = [u8; PACKET_SIZE];

/// Builds the packet for one 32-pixel block.
///
/// `block_index` is 0-based; the wire carries it 1-based.
fn build_block_packet(block_index: usize, pixels: &[Pixel]) -> CommandPacket {
    let mut packet = [0u8; PACKET_SIZE];
    packet[0] = COMMAND_INITIATOR;
    packet[1] = PICTURE_MODE;
    packet[2] = (block_index + 1) as u8;

    for (i, pixel) in pixels.iter().enumerate() {
        let offset = HEADER_SIZE + i * 3;
        packet[offset..offset + 3].copy_from_slice(&pixel.bytes());
    }

    packet[PACKET_SIZE - 1] = TERMINATOR;
    packet
}

/// Encodes a grid into the 8 ordered packets of one full frame.
pub fn encode_frame(grid: &PixelGrid) -> Result<Vec<CommandPacket>> {
    let pixels = grid.pixels();
    if pixels.len() != FRAME_PIXELS {
        return Err(Error::FrameSize {
            expected: FRAME_PIXELS,
            actual: pixels.len(),
        });
    }

    Ok(pixels
        .chunks_exact(PIXELS_PER_BLOCK)
        .enumerate()
        .map(|(block_index, block)| build_block_packet(block_index, block))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_mode_command() {
        assert_eq!(PICTURE_MODE_COMMAND, [0xBC, 0x0F, 0xF1, 0x08, 0x08, 0x55]);
    }

    #[test]
    fn test_packet_geometry() {
        assert_eq!(PACKET_SIZE, 100);
        assert_eq!(FRAME_PIXELS, 256);
    }

    #[test]
    fn test_block_packet_layout() {
        let pixels = vec![Pixel::new(1, 2, 3); PIXELS_PER_BLOCK];
        let packet = build_block_packet(4, &pixels);
        assert_eq!(packet[0], COMMAND_INITIATOR);
        assert_eq!(packet[1], PICTURE_MODE);
        assert_eq!(packet[2], 5); // 1-based block number
        assert_eq!(&packet[3..6], &[1, 2, 3]);
        assert_eq!(packet[99], TERMINATOR);
    }

    #[test]
    fn test_encode_frame_emits_ordered_blocks() {
        let mut grid = PixelGrid::new();
        grid.set_pixel(0, 0, (9, 8, 7)).unwrap();

        let packets = encode_frame(&grid).unwrap();
        assert_eq!(packets.len(), BLOCK_COUNT);
        for (i, packet) in packets.iter().enumerate() {
            assert_eq!(packet.len(), PACKET_SIZE);
            assert_eq!(packet[0], COMMAND_INITIATOR);
            assert_eq!(packet[2], (i + 1) as u8);
            assert_eq!(packet[PACKET_SIZE - 1], TERMINATOR);
        }
        assert_eq!(&packets[0][3..6], &[9, 8, 7]);
    }

    #[test]
    fn test_payloads_concatenate_to_flat_pixel_bytes() {
        let mut grid = PixelGrid::new();
        for y in 0..16 {
            for x in 0..16 {
                grid.set_pixel(x, y, ((x * 16 + y) as u8, y as u8, x as u8))
                    .unwrap();
            }
        }

        let packets = encode_frame(&grid).unwrap();
        let payload: Vec<u8> = packets
            .iter()
            .flat_map(|p| p[HEADER_SIZE..PACKET_SIZE - 1].to_vec())
            .collect();
        let flat: Vec<u8> = grid.pixels().iter().flat_map(|p| p.bytes()).collect();
        assert_eq!(payload, flat);
    }

    #[test]
    fn test_encode_frame_rejects_partial_grids() {
        let grid = PixelGrid::with_dimensions(8, 8);
        assert!(matches!(
            encode_frame(&grid),
            Err(Error::FrameSize {
                expected: 256,
                actual: 64
            })
        ));
    }
}
