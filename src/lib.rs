//! # Pixelveil
//!
//! A secret-keyed image transformation engine offering two independent
//! operations over raster images:
//!
//! - a reversible **chaotic-map pixel cipher** that turns an image into
//!   visual noise recoverable only with the same passphrase, and
//! - a **steganographic codec** that hides a text message inside a carrier
//!   image's pixel data, recoverable only with the same passphrase, while
//!   leaving the carrier visually unchanged.
//!
//! Both operations derive their keystream from the passphrase alone: a
//! SHA-256 seed drives a fixed-point logistic map whose iterates supply
//! pad bytes and slot permutations. Every call is a stateless, synchronous
//! transform over in-memory buffers; nothing is cached or shared between
//! calls.
//!
//! ## Quick start
//!
//! ```no_run
//! use pixelveil::{OutputFormat, PixelVeil};
//!
//! # fn main() -> pixelveil::Result<()> {
//! let engine = PixelVeil::new("my passphrase")?;
//!
//! // Scramble an image into noise, and back
//! let original = std::fs::read("photo.png").unwrap();
//! let noise = engine.encrypt_image(&original, None, OutputFormat::Png)?;
//! let restored = engine.decrypt_image(&noise, None, OutputFormat::Png)?;
//!
//! // Hide a message in a carrier, and recover it
//! let marked = engine.embed_message(&original, "meet at dawn", None)?;
//! let message = engine.extract_message(&marked, None)?;
//! assert_eq!(message, "meet at dawn");
//! # Ok(())
//! # }
//! ```
//!
//! ## Security notes
//!
//! The cipher carries **no authentication tag**: decrypting with a wrong
//! passphrase produces plausible-looking garbage, silently. This is a
//! deliberate simplicity trade-off of the genre, not a defect; callers who
//! need integrity must layer it themselves. Likewise, writing cipher output
//! to a lossy container (JPEG) destroys the exact sample values the inverse
//! transform needs; round trips require [`OutputFormat::Png`].
//!
//! ## Modules
//!
//! - `chaos`: fixed-point logistic-map keystream generator
//! - `cipher`: permute-and-XOR pixel cipher
//! - `stego`: keyed-order LSB codec with length framing
//! - `buffer`: container decode, bounded resize, re-encode

pub mod buffer;
pub mod chaos;
pub mod cipher;
pub mod error;
pub mod key;
pub mod stego;

pub use buffer::{OutputFormat, PixelBuffer};
pub use error::{Result, VeilError};
pub use key::KeySeed;

use crate::buffer::{decode, encode, resize_bound};

/// The transformation engine: a validated passphrase seed plus the four
/// operations. Construction fails on an empty passphrase, before any image
/// data is touched.
pub struct PixelVeil {
    seed: KeySeed,
}

impl PixelVeil {
    /// Create an engine from a passphrase.
    pub fn new(secret: &str) -> Result<Self> {
        Ok(Self {
            seed: key::derive(secret)?,
        })
    }

    /// Encrypt an image into visual noise.
    ///
    /// Pipeline: decode, apply the size bound, cipher, re-encode as
    /// `format`. The bound (cap on the larger side, aspect preserved) is
    /// applied before ciphering; the output dimensions record it, so the
    /// decrypt side must not resize again. Choosing [`OutputFormat::Jpeg`]
    /// here makes the result unrecoverable.
    pub fn encrypt_image(
        &self,
        image: &[u8],
        max_side: Option<u32>,
        format: OutputFormat,
    ) -> Result<Vec<u8>> {
        let buffer = resize_bound(decode(image)?, max_side);
        let ciphered = cipher::encrypt(&buffer, &self.seed);
        encode(&ciphered, format)
    }

    /// Recover an image previously encrypted with the same passphrase.
    ///
    /// The inverse cipher runs at the stored dimensions; the size bound is
    /// applied to the *output* only, never before deciphering (the encrypt
    /// side already resized, and resampling ciphered pixels would garble
    /// the recovery). A wrong passphrase yields garbage, not an error.
    pub fn decrypt_image(
        &self,
        image: &[u8],
        max_side: Option<u32>,
        format: OutputFormat,
    ) -> Result<Vec<u8>> {
        let buffer = decode(image)?;
        let recovered = cipher::decrypt(&buffer, &self.seed);
        encode(&resize_bound(recovered, max_side), format)
    }

    /// Hide a text message inside a carrier image.
    ///
    /// The carrier is decoded, bounded, and marked; the output is always
    /// PNG, since any lossy recompression would destroy the hidden bits.
    pub fn embed_message(
        &self,
        carrier: &[u8],
        message: &str,
        max_side: Option<u32>,
    ) -> Result<Vec<u8>> {
        let buffer = resize_bound(decode(carrier)?, max_side);
        let marked = stego::embed(&buffer, message.as_bytes(), &self.seed)?;
        encode(&marked, OutputFormat::Png)
    }

    /// Recover a hidden message from a carrier image.
    ///
    /// `max_side` is accepted for interface symmetry but not applied: the
    /// carrier's stored dimensions already reflect any bound used at embed
    /// time, and resampling would destroy the embedded bits.
    pub fn extract_message(&self, carrier: &[u8], max_side: Option<u32>) -> Result<String> {
        let _ = max_side;
        let buffer = decode(carrier)?;
        let bytes = stego::extract(&buffer, &self.seed)?;
        String::from_utf8(bytes).map_err(|_| VeilError::CorruptPayload)
    }
}

/// One-shot helper: [`PixelVeil::encrypt_image`] with a fresh engine.
pub fn encrypt_image(
    image: &[u8],
    secret: &str,
    max_side: Option<u32>,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    PixelVeil::new(secret)?.encrypt_image(image, max_side, format)
}

/// One-shot helper: [`PixelVeil::decrypt_image`] with a fresh engine.
pub fn decrypt_image(
    image: &[u8],
    secret: &str,
    max_side: Option<u32>,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    PixelVeil::new(secret)?.decrypt_image(image, max_side, format)
}

/// One-shot helper: [`PixelVeil::embed_message`] with a fresh engine.
pub fn embed_message(
    carrier: &[u8],
    message: &str,
    secret: &str,
    max_side: Option<u32>,
) -> Result<Vec<u8>> {
    PixelVeil::new(secret)?.embed_message(carrier, message, max_side)
}

/// One-shot helper: [`PixelVeil::extract_message`] with a fresh engine.
pub fn extract_message(carrier: &[u8], secret: &str, max_side: Option<u32>) -> Result<String> {
    PixelVeil::new(secret)?.extract_message(carrier, max_side)
}

/// How many message bytes a carrier can hold after the size bound is
/// applied.
pub fn message_capacity(carrier: &[u8], max_side: Option<u32>) -> Result<usize> {
    let buffer = resize_bound(decode(carrier)?, max_side);
    Ok(stego::capacity_bytes(&buffer))
}
