//! The FreeBSD MD5-crypt password scheme (`$1$salt$digest`).
//!
//! This is the registry's legacy password scheme. It survives for
//! compatibility with hashes already present in maintainer objects; new
//! credentials should use the bcrypt scheme.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

const CRYPT64: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const MAGIC: &str = "$1$";
const MAX_SALT_LEN: usize = 8;

/// Hash `password` under MD5-crypt with the given salt (at most 8
/// characters are used) and return the full `$1$salt$digest` string.
pub fn md5_crypt(password: &[u8], salt: &str) -> String {
    let salt = &salt.as_bytes()[..salt.len().min(MAX_SALT_LEN)];

    let mut ctx = Md5::new();
    ctx.update(password);
    ctx.update(MAGIC.as_bytes());
    ctx.update(salt);

    let mut alt = Md5::new();
    alt.update(password);
    alt.update(salt);
    alt.update(password);
    let alt = alt.finalize();

    let mut remaining = password.len();
    while remaining > 0 {
        let take = remaining.min(16);
        ctx.update(&alt[..take]);
        remaining -= take;
    }

    let mut bits = password.len();
    while bits > 0 {
        if bits & 1 == 1 {
            ctx.update([0u8]);
        } else {
            ctx.update(&password[..1]);
        }
        bits >>= 1;
    }

    let mut digest = ctx.finalize();

    // The 1000-round stretching loop, exactly as the original scheme
    // defines it.
    for round in 0..1000 {
        let mut ctx = Md5::new();
        if round & 1 == 1 {
            ctx.update(password);
        } else {
            ctx.update(&digest);
        }
        if round % 3 != 0 {
            ctx.update(salt);
        }
        if round % 7 != 0 {
            ctx.update(password);
        }
        if round & 1 == 1 {
            ctx.update(&digest);
        } else {
            ctx.update(password);
        }
        digest = ctx.finalize();
    }

    let b = digest;
    let mut encoded = String::with_capacity(22);
    for &(x, y, z) in &[(0, 6, 12), (1, 7, 13), (2, 8, 14), (3, 9, 15), (4, 10, 5)] {
        let mut v = (u32::from(b[x]) << 16) | (u32::from(b[y]) << 8) | u32::from(b[z]);
        for _ in 0..4 {
            encoded.push(CRYPT64[(v & 0x3f) as usize] as char);
            v >>= 6;
        }
    }
    let mut v = u32::from(b[11]);
    for _ in 0..2 {
        encoded.push(CRYPT64[(v & 0x3f) as usize] as char);
        v >>= 6;
    }

    let salt = std::str::from_utf8(salt).unwrap_or_default();
    format!("{MAGIC}{salt}${encoded}")
}

/// Verify a candidate password against a stored `$1$salt$digest` hash.
///
/// The comparison is constant-time over the recomputed hash. A stored value
/// that does not look like an MD5-crypt hash never verifies.
pub fn verify(candidate: &str, stored: &str) -> bool {
    let Some(rest) = stored.strip_prefix(MAGIC) else {
        return false;
    };
    let Some((salt, _)) = rest.split_once('$') else {
        return false;
    };
    let recomputed = md5_crypt(candidate.as_bytes(), salt);
    recomputed.as_bytes().ct_eq(stored.as_bytes()).into()
}
