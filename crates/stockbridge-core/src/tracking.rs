//! Tracking codes — the caller-facing identity of a shipment.
//!
//! Codes are `AWB` followed by twelve decimal digits, e.g. `AWB824373517914`.
//! The generator never consults the store; uniqueness is enforced by the
//! store's UNIQUE constraint and collisions are retried by
//! [`crate::Tracker::create`].

use std::fmt;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Fixed prefix of every generated code.
pub const PREFIX: &str = "AWB";

/// Number of decimal digits following [`PREFIX`].
pub const DIGITS: usize = 12;

/// A shipment tracking code. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
  /// Generate a fresh code from the operating-system RNG.
  pub fn generate() -> Self { Self::generate_with(&mut OsRng) }

  /// Generate a code drawing digits from `rng`.
  pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Self {
    let mut code = String::with_capacity(PREFIX.len() + DIGITS);
    code.push_str(PREFIX);
    for _ in 0..DIGITS {
      code.push(char::from(b'0' + random_digit(rng)));
    }
    Self(code)
  }

  /// Wrap a code read back from storage. No format check is applied; the
  /// store is authoritative for what it holds.
  pub fn from_stored(code: String) -> Self { Self(code) }

  /// Whether `s` has the shape of a generated code.
  pub fn is_well_formed(s: &str) -> bool {
    s.len() == PREFIX.len() + DIGITS
      && s.starts_with(PREFIX)
      && s[PREFIX.len()..].bytes().all(|b| b.is_ascii_digit())
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for TrackingCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for TrackingCode {
  fn as_ref(&self) -> &str { &self.0 }
}

/// Uniform digit in `0..10`, rejecting the biased tail of the `u32` range.
fn random_digit<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
  const ZONE: u32 = u32::MAX - (u32::MAX % 10);
  loop {
    let n = rng.next_u32();
    if n < ZONE {
      return (n % 10) as u8;
    }
  }
}

#[cfg(test)]
mod tests {
  use rand_core::impls;

  use super::*;

  /// Yields the same word forever.
  struct Fixed(u32);

  impl RngCore for Fixed {
    fn next_u32(&mut self) -> u32 { self.0 }

    fn next_u64(&mut self) -> u64 { impls::next_u64_via_u32(self) }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
      impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn generated_codes_are_well_formed() {
    for _ in 0..200 {
      let code = TrackingCode::generate();
      assert!(TrackingCode::is_well_formed(code.as_str()), "bad code: {code}");
    }
  }

  #[test]
  fn digits_come_from_the_rng() {
    let code = TrackingCode::generate_with(&mut Fixed(7));
    assert_eq!(code.as_str(), "AWB777777777777");
  }

  #[test]
  fn well_formed_rejects_other_shapes() {
    assert!(TrackingCode::is_well_formed("AWB000000000000"));
    assert!(!TrackingCode::is_well_formed("AWB00000000000"));
    assert!(!TrackingCode::is_well_formed("awb000000000000"));
    assert!(!TrackingCode::is_well_formed("AWB00000000000X"));
    assert!(!TrackingCode::is_well_formed("K3J9QX2M7A"));
  }
}
