use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

use primitives::Balance;

// Re-export the shared handles from primitives as the single source of truth
pub use primitives::{AssetKind, FeeTier, NetworkId, VenueId};

/// How a step's `amount` is interpreted, with the bound the caller accepts for the leg.
#[derive(
  Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub enum SwapType<Balance> {
  /// Spend everything the router holds of `token_in`; `amount` is the opening input.
  /// The leg fails unless the venue delivers at least `min_amount_out` (zero disables).
  ExactInput { min_amount_out: Balance },
  /// Receive exactly `amount` of `token_out`, spending at most `max_amount_in`.
  ExactOutput { max_amount_in: Balance },
}

/// One hop of an order: a single conversion on a single venue.
#[derive(
  Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct SwapStep {
  pub token_in: AssetKind,
  pub token_out: AssetKind,
  /// Passed to the venue untouched
  pub fee: FeeTier,
  pub venue: VenueId,
  pub amount: Balance,
  pub swap_type: SwapType<Balance>,
}

impl SwapStep {
  /// Input the caller must provide when this step opens an order.
  pub fn opening_amount(&self) -> Balance {
    match self.swap_type {
      SwapType::ExactInput { .. } => self.amount,
      SwapType::ExactOutput { max_amount_in } => max_amount_in,
    }
  }
}

/// A linear chain of steps with a deadline and a floor on the final output.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub struct SwapOrder<BlockNumber> {
  pub steps: Vec<SwapStep>,
  /// Last block in which the order may execute
  pub deadline: BlockNumber,
  pub min_amount_out: Balance,
}

impl<BlockNumber> SwapOrder<BlockNumber> {
  /// Tokens visited in order: the opening input followed by every step output.
  pub fn path(&self) -> Vec<AssetKind> {
    self
      .steps
      .first()
      .map(|first| first.token_in)
      .into_iter()
      .chain(self.steps.iter().map(|step| step.token_out))
      .collect()
  }
}

/// What the router asks a venue to do for one leg.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueRequest<AccountId, Balance> {
  /// Account holding the input; the venue may pull up to its allowance
  pub payer: AccountId,
  /// Account the output must be delivered to
  pub recipient: AccountId,
  pub asset_in: AssetKind,
  pub asset_out: AssetKind,
  pub fee: FeeTier,
  pub swap_type: SwapType<Balance>,
  /// Input to spend for `ExactInput`, output to deliver for `ExactOutput`
  pub amount: Balance,
}

/// Amounts a venue reports after a successful leg.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VenueFill<Balance> {
  pub amount_in: Balance,
  pub amount_out: Balance,
}

/// Unspent input handed back to the caller at settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refund {
  /// Token as the caller named it (may be `Native`)
  pub token: AssetKind,
  /// Asset the router actually holds
  pub asset: AssetKind,
  pub amount: Balance,
}

/// Per-call cursor of an executing order. Never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionState {
  pub current_token: AssetKind,
  pub current_amount: Balance,
  pub step_index: u32,
  pub refunds: Vec<Refund>,
}

impl ExecutionState {
  pub fn open(token: AssetKind, amount: Balance) -> Self {
    Self {
      current_token: token,
      current_amount: amount,
      step_index: 0,
      refunds: Vec::new(),
    }
  }

  /// Move to the next step holding `amount` of `token`.
  pub fn advance(&mut self, token: AssetKind, amount: Balance) {
    self.current_token = token;
    self.current_amount = amount;
    self.step_index = self.step_index.saturating_add(1);
  }

  pub fn refund(&mut self, token: AssetKind, asset: AssetKind, amount: Balance) {
    if amount > 0 {
      self.refunds.push(Refund {
        token,
        asset,
        amount,
      });
    }
  }
}

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Create `asset` so it can be minted and transferred.
  fn create_asset(asset: AssetKind) -> polkadot_sdk::sp_runtime::DispatchResult;
  fn mint_asset(
    asset: AssetKind,
    to: &AccountId,
    amount: Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult;
  /// Account of a venue that answers any exact-input leg with `amount_out` of the
  /// requested asset, funded with enough `asset_out` to do so.
  fn deploy_venue(index: u32, asset_out: AssetKind, amount_out: Balance) -> AccountId;
}
