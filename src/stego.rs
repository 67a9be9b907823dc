//! Keyed LSB steganography.
//!
//! The message is framed with a 32-bit little-endian length header and the
//! framed bits are written to the least-significant bits of carrier samples,
//! in an order given by a secret-keyed Fisher-Yates permutation over every
//! (pixel, channel) slot. Header bits are drawn first in generator order,
//! then message bits. Extraction rebuilds the identical visiting order from
//! the same secret, reads the header to learn how many bits follow, and
//! stops exactly there, with no terminator sentinel that could collide with
//! message content.
//!
//! Only visited LSBs change; every other bit of every sample is left
//! untouched, so the carrier is not perceptibly altered. The output must be
//! stored losslessly (the engine fixes the stego container to PNG): any
//! lossy recompression destroys the hidden bits.

use crate::buffer::PixelBuffer;
use crate::chaos::ChaoticStream;
use crate::error::{Result, VeilError};
use crate::key::KeySeed;

/// Width of the message-length header, in bits.
pub const HEADER_BITS: usize = 32;

/// Maximum message bytes a carrier can hold.
pub fn capacity_bytes(carrier: &PixelBuffer) -> usize {
    carrier.sample_count().saturating_sub(HEADER_BITS) / 8
}

/// Hide `message` in the carrier's sample LSBs.
///
/// Fails with [`VeilError::MessageTooLarge`] before any sample is touched
/// if the framed message does not fit.
pub fn embed(carrier: &PixelBuffer, message: &[u8], seed: &KeySeed) -> Result<PixelBuffer> {
    let capacity = carrier.sample_count() as u64;
    let needed = HEADER_BITS as u64 + 8 * message.len() as u64;
    // The length header is 32 bits wide
    if needed > capacity || message.len() as u64 > u64::from(u32::MAX) {
        return Err(VeilError::MessageTooLarge { needed, capacity });
    }

    let mut stream = ChaoticStream::from_seed(seed);
    let order = stream.permutation(carrier.sample_count());

    let mut payload = Vec::with_capacity(4 + message.len());
    payload.extend_from_slice(&(message.len() as u32).to_le_bytes());
    payload.extend_from_slice(message);

    let mut out = carrier.clone();
    let samples = out.data_mut();
    for (bit_idx, &slot) in order[..needed as usize].iter().enumerate() {
        let bit = (payload[bit_idx / 8] >> (7 - bit_idx % 8)) & 1;
        samples[slot] = (samples[slot] & 0xFE) | bit;
    }

    Ok(out)
}

/// Recover the hidden message bytes from a carrier.
///
/// A wrong secret regenerates a different visiting order and reads noise;
/// the implausible length it decodes is reported as
/// [`VeilError::NoHiddenMessage`].
pub fn extract(carrier: &PixelBuffer, seed: &KeySeed) -> Result<Vec<u8>> {
    let samples = carrier.data();
    let capacity = samples.len() as u64;
    if (HEADER_BITS as u64) > capacity {
        return Err(VeilError::NoHiddenMessage);
    }

    let mut stream = ChaoticStream::from_seed(seed);
    let order = stream.permutation(samples.len());

    let mut header = [0u8; 4];
    for (bit_idx, &slot) in order[..HEADER_BITS].iter().enumerate() {
        header[bit_idx / 8] |= (samples[slot] & 1) << (7 - bit_idx % 8);
    }
    let msg_len = u64::from(u32::from_le_bytes(header));

    if HEADER_BITS as u64 + 8 * msg_len > capacity {
        return Err(VeilError::NoHiddenMessage);
    }

    let msg_bits = 8 * msg_len as usize;
    let mut message = vec![0u8; msg_len as usize];
    for (bit_idx, &slot) in order[HEADER_BITS..HEADER_BITS + msg_bits].iter().enumerate() {
        message[bit_idx / 8] |= (samples[slot] & 1) << (7 - bit_idx % 8);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    fn noise_carrier(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for i in 0..(width as usize * height as usize * 3) {
            data.push((i.wrapping_mul(31).wrapping_add(17) % 251) as u8);
        }
        PixelBuffer::from_raw(width, height, data)
    }

    #[test]
    fn test_roundtrip() {
        let seed = key::derive("stego secret").unwrap();
        let carrier = noise_carrier(64, 64);
        let message = b"The quick brown fox jumps over the lazy dog";

        let marked = embed(&carrier, message, &seed).unwrap();
        assert_eq!(extract(&marked, &seed).unwrap(), message);
    }

    #[test]
    fn test_empty_message_roundtrip() {
        let seed = key::derive("stego secret").unwrap();
        let carrier = noise_carrier(8, 8);
        let marked = embed(&carrier, b"", &seed).unwrap();
        assert_eq!(extract(&marked, &seed).unwrap(), b"");
    }

    #[test]
    fn test_capacity_boundary() {
        let seed = key::derive("boundary").unwrap();
        // 4x4 RGB carrier: 48 slots, 32 header bits, room for exactly 2 bytes
        let carrier = noise_carrier(4, 4);
        assert_eq!(capacity_bytes(&carrier), 2);

        let fits = embed(&carrier, b"ab", &seed);
        assert!(fits.is_ok());
        assert_eq!(extract(&fits.unwrap(), &seed).unwrap(), b"ab");

        let too_big = embed(&carrier, b"abc", &seed);
        assert!(matches!(too_big, Err(VeilError::MessageTooLarge { .. })));
    }

    #[test]
    fn test_carrier_smaller_than_header() {
        let seed = key::derive("tiny").unwrap();
        let carrier = noise_carrier(1, 1); // 3 slots, header alone needs 32
        assert!(matches!(
            embed(&carrier, b"", &seed),
            Err(VeilError::MessageTooLarge { .. })
        ));
        assert!(matches!(
            extract(&carrier, &seed),
            Err(VeilError::NoHiddenMessage)
        ));
    }

    #[test]
    fn test_imperceptibility() {
        let seed = key::derive("invisible").unwrap();
        let carrier = noise_carrier(32, 32);
        let message = b"hidden in plain sight";
        let marked = embed(&carrier, message, &seed).unwrap();

        let mut touched_lsbs = 0;
        for (before, after) in carrier.data().iter().zip(marked.data()) {
            // Everything above the LSB is bit-identical
            assert_eq!(before & 0xFE, after & 0xFE);
            if before != after {
                touched_lsbs += 1;
            }
        }
        let written_bits = HEADER_BITS + message.len() * 8;
        assert!(touched_lsbs <= written_bits);
    }

    #[test]
    fn test_wrong_secret_does_not_recover() {
        let carrier = noise_carrier(64, 64);
        let message = b"for your eyes only";
        let marked = embed(&carrier, message, &key::derive("right").unwrap()).unwrap();

        // Wrong key reads noise: either the garbage length trips the
        // plausibility check, or the recovered bytes are not the message
        match extract(&marked, &key::derive("wrong").unwrap()) {
            Err(VeilError::NoHiddenMessage) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(recovered) => assert_ne!(recovered, message),
        }
    }

    #[test]
    fn test_unmarked_carrier() {
        let seed = key::derive("nothing there").unwrap();
        let carrier = noise_carrier(64, 64);
        match extract(&carrier, &seed) {
            Err(VeilError::NoHiddenMessage) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(recovered) => assert!(recovered.len() <= capacity_bytes(&carrier)),
        }
    }
}
