//! Ecosystem Constants for the Cross-Venue Router
//!
//! Pallet IDs, network identifiers and routing bounds shared by the pallet, its mock
//! runtime and any runtime that wires the router in.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Cross-venue router custody account
  pub const CROSS_VENUE_ROUTER_PALLET_ID: &[u8; 8] = b"xvrouter";
}

/// Well-known network identifiers for the wrapped-native registry.
pub mod network_ids {
  use crate::NetworkId;

  /// Local development network
  pub const LOCAL_DEV: NetworkId = 31_337;
}

/// Routing parameters.
pub mod params {
  use super::Balance;
  use crate::VenueId;

  /// Precision scalar for amounts in tests and fixtures (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;

  /// Maximum number of steps in one swap order.
  ///
  /// Bounds the work of a single order; each step is one venue call.
  pub const MAX_SWAP_STEPS: u32 = 4;

  /// Number of venue slots (ids `0..MAX_VENUES`).
  pub const MAX_VENUES: VenueId = 8;
}
