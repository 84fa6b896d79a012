//! Adapter traits for the cross-venue router
//!
//! The runtime supplies venue mechanics and native wrapping through these traits,
//! keeping the pallet independent of any concrete exchange.

use crate::types::{AssetKind, VenueFill, VenueRequest};
use frame::prelude::*;

/// Uniform swap capability every venue exposes.
///
/// `venue` is the account registered for the venue id; implementations dispatch on it.
/// The venue pulls at most its allowance of `request.asset_in` from `request.payer`,
/// delivers `request.asset_out` to `request.recipient` and reports both amounts.
/// On error nothing may have moved.
pub trait VenueAdapter<AccountId, Balance> {
  fn swap(
    venue: &AccountId,
    request: VenueRequest<AccountId, Balance>,
  ) -> Result<VenueFill<Balance>, DispatchError>;
}

/// Conversion between the native token and its wrapped asset.
pub trait NativeWrapper<AccountId, Balance> {
  /// Turn `amount` native held by `who` into the same amount of `wrapped`.
  fn wrap(who: &AccountId, wrapped: AssetKind, amount: Balance) -> DispatchResult;

  /// Turn `amount` of `wrapped` held by `who` back into native.
  fn unwrap(who: &AccountId, wrapped: AssetKind, amount: Balance) -> DispatchResult;
}

/// No venues configured: every swap fails.
impl<AccountId, Balance> VenueAdapter<AccountId, Balance> for () {
  fn swap(
    _: &AccountId,
    _: VenueRequest<AccountId, Balance>,
  ) -> Result<VenueFill<Balance>, DispatchError> {
    Err(DispatchError::Other("VenueAdapter not configured"))
  }
}

/// Runtimes without a wrapped native asset reject native legs.
impl<AccountId, Balance> NativeWrapper<AccountId, Balance> for () {
  fn wrap(_: &AccountId, _: AssetKind, _: Balance) -> DispatchResult {
    Err(DispatchError::Other("NativeWrapper not configured"))
  }

  fn unwrap(_: &AccountId, _: AssetKind, _: Balance) -> DispatchResult {
    Err(DispatchError::Other("NativeWrapper not configured"))
  }
}
