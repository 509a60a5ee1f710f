use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::constants::{permissions, KEY_LEN_32, PRIV_KEY_FILE, PUB_KEY_FILE};
use crate::crypto::types::KeyError;

/// Long-lived X25519 identity of a sensor or collector.
#[derive(Clone)]
pub struct KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_secret(StaticSecret::random_from_rng(OsRng))
    }

    pub fn from_secret_bytes(bytes: [u8; KEY_LEN_32]) -> Self {
        Self::from_secret(StaticSecret::from(bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    #[inline]
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    #[inline]
    pub fn public_bytes(&self) -> [u8; KEY_LEN_32] {
        self.public.to_bytes()
    }

    #[inline]
    pub(crate) fn secret(&self) -> &StaticSecret {
        &self.secret
    }

    /// Write `pub.key` and `priv.key` as hex into `dir`.
    /// Returns `(public_path, private_path)`.
    pub fn write_hex(&self, dir: &Path) -> Result<(PathBuf, PathBuf), KeyError> {
        fs::create_dir_all(dir).map_err(|source| KeyError::Io { path: dir.to_path_buf(), source })?;

        let pub_path = dir.join(PUB_KEY_FILE);
        fs::write(&pub_path, hex::encode(self.public.as_bytes()))
            .map_err(|source| KeyError::Io { path: pub_path.clone(), source })?;

        let priv_path = dir.join(PRIV_KEY_FILE);
        write_private(&priv_path, hex::encode(self.secret.to_bytes()).as_bytes())
            .map_err(|source| KeyError::Io { path: priv_path.clone(), source })?;

        Ok((pub_path, priv_path))
    }

    /// Load a hex private key and derive its public half.
    pub fn load_private(path: &Path) -> Result<Self, KeyError> {
        Ok(Self::from_secret_bytes(read_hex_key(path)?))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public.as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Load a hex public key (e.g. the collector's `pub.key`).
pub fn load_public(path: &Path) -> Result<PublicKey, KeyError> {
    Ok(PublicKey::from(read_hex_key(path)?))
}

/// Public key from the clear-text prefix of a datagram.
pub fn public_from_slice(bytes: &[u8]) -> Option<PublicKey> {
    let arr: [u8; KEY_LEN_32] = bytes.try_into().ok()?;
    Some(PublicKey::from(arr))
}

fn read_hex_key(path: &Path) -> Result<[u8; KEY_LEN_32], KeyError> {
    let text = fs::read_to_string(path).map_err(|source| KeyError::Io { path: path.to_path_buf(), source })?;
    let raw = hex::decode(text.trim()).map_err(|source| KeyError::Hex { path: path.to_path_buf(), source })?;
    let actual = raw.len();
    raw.try_into().map_err(|_| KeyError::InvalidLen {
        path: path.to_path_buf(),
        expected: KEY_LEN_32,
        actual,
    })
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(permissions::PRIV_KEY)
        .open(path)?;
    f.write_all(contents)?;
    f.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let _ = permissions::PRIV_KEY;
    let mut f = fs::File::create(path)?;
    f.write_all(contents)?;
    f.sync_all()
}
