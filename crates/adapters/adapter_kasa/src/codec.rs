//! Kasa wire codec.
//!
//! Each message is a 4-byte big-endian length followed by the payload,
//! XOR-ed with an autokey stream: the key starts at 171 and becomes the
//! previous ciphertext byte.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::KasaError;

const INITIAL_KEY: u8 = 171;
/// Largest reply accepted from a plug.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

#[must_use]
pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    plain
        .iter()
        .map(|byte| {
            key ^= byte;
            key
        })
        .collect()
}

#[must_use]
pub fn decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    cipher
        .iter()
        .map(|&byte| {
            let plain = key ^ byte;
            key = byte;
            plain
        })
        .collect()
}

/// Encrypt and write one length-prefixed frame.
///
/// # Errors
///
/// Returns [`KasaError::Io`] if the write fails and
/// [`KasaError::FrameTooLarge`] for payloads over [`MAX_FRAME_LEN`].
pub async fn write_frame<W>(writer: &mut W, plain: &[u8]) -> Result<(), KasaError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(plain.len())
        .ok()
        .filter(|len| *len <= MAX_FRAME_LEN)
        .ok_or(KasaError::FrameTooLarge(plain.len()))?;
    let mut frame = Vec::with_capacity(plain.len() + 4);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend(encrypt(plain));
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read and decrypt one length-prefixed frame.
///
/// # Errors
///
/// Returns [`KasaError::Io`] if the read fails or ends early and
/// [`KasaError::FrameTooLarge`] if the announced length is over
/// [`MAX_FRAME_LEN`].
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, KasaError>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32().await?;
    if len > MAX_FRAME_LEN {
        return Err(KasaError::FrameTooLarge(len as usize));
    }
    let mut cipher = vec![0; len as usize];
    reader.read_exact(&mut cipher).await?;
    Ok(decrypt(&cipher))
}
