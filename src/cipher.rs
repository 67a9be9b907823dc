//! Secret-keyed pixel cipher.
//!
//! Two stages share one keystream: a chaotic Fisher-Yates permutation
//! scatters whole pixels, then every sample byte is XORed with one keystream
//! byte. Encryption and decryption are distinct inverse procedures drawing
//! from the stream in the same order, so `decrypt(encrypt(p, k), k) == p`
//! for every buffer and every key.
//!
//! There is no authentication tag: decrypting with the wrong secret yields
//! plausible-looking noise instead of an error.

use rayon::prelude::*;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::chaos::ChaoticStream;
use crate::key::KeySeed;

/// Encrypt a pixel buffer. Dimensions are preserved; the input is untouched.
pub fn encrypt(buffer: &PixelBuffer, seed: &KeySeed) -> PixelBuffer {
    let mut stream = ChaoticStream::from_seed(seed);
    let perm = stream.permutation(buffer.pixel_count());

    // Scatter pixels through the keyed permutation
    let chan = CHANNELS as usize;
    let data = buffer.data();
    let mut out = vec![0u8; data.len()];
    for (dst, &src) in perm.iter().enumerate() {
        out[dst * chan..(dst + 1) * chan].copy_from_slice(&data[src * chan..(src + 1) * chan]);
    }

    // One keystream byte per sample
    let pad = draw_pad(&mut stream, out.len());
    out.par_iter_mut()
        .zip(pad.par_iter())
        .for_each(|(byte, &k)| *byte ^= k);

    PixelBuffer::from_raw(buffer.width(), buffer.height(), out)
}

/// Decrypt a pixel buffer produced by [`encrypt`] under the same seed.
pub fn decrypt(buffer: &PixelBuffer, seed: &KeySeed) -> PixelBuffer {
    let mut stream = ChaoticStream::from_seed(seed);
    let perm = stream.permutation(buffer.pixel_count());
    let pad = draw_pad(&mut stream, buffer.sample_count());

    // Undo the XOR pad first, then gather pixels back through the
    // inverse permutation
    let mut mixed = buffer.data().to_vec();
    mixed
        .par_iter_mut()
        .zip(pad.par_iter())
        .for_each(|(byte, &k)| *byte ^= k);

    let chan = CHANNELS as usize;
    let mut out = vec![0u8; mixed.len()];
    for (src, &dst) in perm.iter().enumerate() {
        out[dst * chan..(dst + 1) * chan].copy_from_slice(&mixed[src * chan..(src + 1) * chan]);
    }

    PixelBuffer::from_raw(buffer.width(), buffer.height(), out)
}

fn draw_pad(stream: &mut ChaoticStream, len: usize) -> Vec<u8> {
    (0..len).map(|_| stream.next_byte()).collect()
}
