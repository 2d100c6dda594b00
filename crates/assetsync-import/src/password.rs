//! Initial passwords for created users.

use rand::rngs::OsRng;
use rand::Rng;

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 12;

/// ASCII letters, digits and the 32 ASCII punctuation characters.
pub const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A freshly generated password.
///
/// Only the results file sees the plaintext; [`Debug`] is redacted so it
/// cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedPassword(String);

impl GeneratedPassword {
    /// Draw [`PASSWORD_LENGTH`] characters uniformly from [`PASSWORD_ALPHABET`]
    /// using the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::with_length(PASSWORD_LENGTH)
    }

    fn with_length(length: usize) -> Self {
        let mut rng = OsRng;
        let password = (0..length)
            .map(|_| char::from(PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())]))
            .collect();
        Self(password)
    }

    /// The plaintext value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GeneratedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GeneratedPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}
