//! Identifiers used to address venues and networks in swap orders.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::Permill;

/// Small integer selecting a registered venue adapter.
pub type VenueId = u8;

/// Network (chain) identifier keying the wrapped-native registry.
pub type NetworkId = u64;

/// Pool fee tier in parts-per-million (3000 = 0.3%).
///
/// The router never charges it; the tier is handed to the venue so it can pick the
/// matching pool.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct FeeTier(pub u32);

impl FeeTier {
  /// 0.01%
  pub const LOWEST: FeeTier = FeeTier(100);
  /// 0.05%
  pub const LOW: FeeTier = FeeTier(500);
  /// 0.3%
  pub const MEDIUM: FeeTier = FeeTier(3_000);
  /// 1%
  pub const HIGH: FeeTier = FeeTier(10_000);

  const PARTS_PER_MILLION: u32 = 1_000_000;

  /// A tier above 100% cannot describe a pool.
  pub fn is_valid(&self) -> bool {
    self.0 <= Self::PARTS_PER_MILLION
  }

  pub fn as_permill(&self) -> Permill {
    Permill::from_parts(self.0)
  }
}

impl From<u32> for FeeTier {
  fn from(parts: u32) -> Self {
    FeeTier(parts)
  }
}
