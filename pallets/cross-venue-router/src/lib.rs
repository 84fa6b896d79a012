//! Cross-Venue Router Pallet
//!
//! Executes a linear chain of swap steps, each on an explicitly chosen venue, and
//! settles the final output to the caller only if it clears the order's floor.
//!
//! ## Overview
//!
//! - **Venue registry**: `VenueId -> adapter account`, written by the operator.
//! - **Wrapped-native registry**: `NetworkId -> AssetKind`, written by the operator. Steps
//!   naming `AssetKind::Native` are swapped through the asset registered for
//!   [`Config::NetworkId`].
//! - **Engine**: pulls the caller's opening input into the pallet account, walks the
//!   steps venue by venue, then pays out the final token and any unspent leg input.
//!
//! An order is one unit of work: funding, every venue call and settlement run inside a
//! single storage layer, so a failure anywhere leaves balances exactly as they were.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{NativeWrapper, VenueAdapter};

pub mod types;
pub use types::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Log target for the router
pub const LOG_TARGET: &str = "runtime::cross-venue-router";

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::deps::frame_support::{
    PalletId,
    storage::with_storage_layer,
    traits::{
      EnsureOrigin,
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{
        Inspect as FungiblesInspect, Mutate as FungiblesMutate,
        approvals::{Inspect as ApprovalInspect, Mutate as ApprovalMutate},
      },
      tokens::Preservation,
    },
  };
  use frame::prelude::*;
  use polkadot_sdk::sp_runtime::traits::AccountIdConversion;
  use primitives::AssetInspector;

  /// Balance type
  pub type Balance = primitives::Balance;

  /// Order as submitted by callers of this runtime
  pub type SwapOrderOf<T> = SwapOrder<BlockNumberFor<T>>;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    /// Native currency, used when an order opens or settles in `AssetKind::Native`
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId>;

    /// Fungible assets with delegated spending (allowances)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId>
      + ApprovalInspect<Self::AccountId>
      + ApprovalMutate<Self::AccountId>;

    /// Swap mechanics of every registered venue
    type Venues: VenueAdapter<Self::AccountId, Balance>;

    /// Wrapping of the native token into its registered asset
    type NativeWrapper: NativeWrapper<Self::AccountId, Balance>;

    /// Origin that appoints the operator
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID for the custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Identifier of this network in the wrapped-native registry
    #[pallet::constant]
    type NetworkId: Get<NetworkId>;

    /// Maximum number of steps in one order
    #[pallet::constant]
    type MaxSteps: Get<u32>;

    /// Venue ids must be below this bound
    #[pallet::constant]
    type MaxVenues: Get<VenueId>;

    /// Weight information
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::types::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Sole account allowed to edit the registries
  #[pallet::storage]
  pub type Operator<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Venue id to the account of its adapter
  #[pallet::storage]
  pub type VenueRegistry<T: Config> = StorageMap<_, Twox64Concat, VenueId, T::AccountId, OptionQuery>;

  /// Network id to the asset wrapping that network's native token
  #[pallet::storage]
  pub type WrappedNativeRegistry<T: Config> =
    StorageMap<_, Twox64Concat, NetworkId, AssetKind, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// An order settled
    SwapExecuted {
      who: T::AccountId,
      path: Vec<AssetKind>,
      amount_out: Balance,
    },
    /// A venue slot was set (`Some`) or cleared (`None`)
    VenueUpdated {
      venue: VenueId,
      adapter: Option<T::AccountId>,
    },
    /// A wrapped-native entry was set (`Some`) or cleared (`None`)
    WrappedNativeUpdated {
      network: NetworkId,
      token: Option<AssetKind>,
    },
    /// The operator changed
    OperatorChanged {
      old: Option<T::AccountId>,
      new: T::AccountId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Caller is not the operator
    Unauthorized,
    /// Order deadline has passed
    Expired,
    /// A step's input is not the previous step's output
    MalformedChain,
    /// A step names a venue with no registered adapter
    UnknownVenue,
    /// Caller's balance or allowance cannot cover the opening input, or a payout failed
    InsufficientAllowanceOrBalance,
    /// A venue failed or did not deliver what it reported
    VenueExecutionFailed,
    /// Final output below the order's minimum
    SlippageExceeded,
    /// Order has no steps
    EmptyOrder,
    /// Order has more steps than `MaxSteps`
    TooManySteps,
    /// Step amount or budget is zero
    ZeroAmount,
    /// Step swaps an asset into itself
    IdenticalAssets,
    /// Fee tier above 100%
    InvalidFeeTier,
    /// Venue id outside `0..MaxVenues`
    InvalidVenueId,
    /// The native token cannot wrap itself
    InvalidWrappedNative,
    /// A step uses the native token but this network has no wrapped asset registered
    WrappedNativeNotConfigured,
    /// Exact-output budget exceeds what the router holds for the leg
    InputBudgetExceeded,
    /// Wrapping or unwrapping the native token failed
    NativeWrappingFailed,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Execute a multi-step swap order on behalf of the signer.
    ///
    /// The signer must have approved the pallet account for the opening input of a
    /// non-native first step.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::execute_swap(order.steps.len() as u32))]
    pub fn execute_swap(origin: OriginFor<T>, order: SwapOrderOf<T>) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::execute_swap_for(&who, &order)?;
      Ok(())
    }

    /// Register (`Some`) or disable (`None`) the adapter of a venue slot (operator only)
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_venue())]
    pub fn set_venue(
      origin: OriginFor<T>,
      venue: VenueId,
      adapter: Option<T::AccountId>,
    ) -> DispatchResult {
      Self::ensure_operator(origin)?;
      ensure!(venue < T::MaxVenues::get(), Error::<T>::InvalidVenueId);
      match &adapter {
        Some(account) => VenueRegistry::<T>::insert(venue, account),
        None => VenueRegistry::<T>::remove(venue),
      }
      Self::deposit_event(Event::VenueUpdated { venue, adapter });
      Ok(())
    }

    /// Register (`Some`) or clear (`None`) the wrapped-native asset of a network (operator only)
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_wrapped_native())]
    pub fn set_wrapped_native(
      origin: OriginFor<T>,
      network: NetworkId,
      token: Option<AssetKind>,
    ) -> DispatchResult {
      Self::ensure_operator(origin)?;
      match token {
        Some(asset) => {
          ensure!(!asset.is_native(), Error::<T>::InvalidWrappedNative);
          WrappedNativeRegistry::<T>::insert(network, asset);
        }
        None => WrappedNativeRegistry::<T>::remove(network),
      }
      Self::deposit_event(Event::WrappedNativeUpdated { network, token });
      Ok(())
    }

    /// Appoint the operator (governance only)
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::set_operator())]
    pub fn set_operator(origin: OriginFor<T>, new_operator: T::AccountId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let old = Operator::<T>::get();
      Operator::<T>::put(&new_operator);
      Self::deposit_event(Event::OperatorChanged {
        old,
        new: new_operator,
      });
      Ok(())
    }
  }

  /// A validated step with its venue and concrete assets resolved
  #[derive(Clone, Debug, PartialEq, Eq)]
  pub struct RoutedStep<AccountId> {
    pub step: SwapStep,
    pub venue: AccountId,
    pub asset_in: AssetKind,
    pub asset_out: AssetKind,
  }

  impl<T: Config> Pallet<T> {
    /// Get pallet account ID
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Adapter account registered for `venue`
    pub fn venue(venue: VenueId) -> Option<T::AccountId> {
      VenueRegistry::<T>::get(venue)
    }

    /// Wrapped-native asset registered for `network`
    pub fn wrapped_native(network: NetworkId) -> Option<AssetKind> {
      WrappedNativeRegistry::<T>::get(network)
    }

    /// Wrapped-native asset of the network this runtime runs on
    pub fn current_wrapped_native() -> Option<AssetKind> {
      Self::wrapped_native(T::NetworkId::get())
    }

    /// Current operator
    pub fn operator() -> Option<T::AccountId> {
      Operator::<T>::get()
    }

    /// Public entry point for swaps on behalf of `who` (extrinsic and other pallets).
    /// Returns the amount of the final token delivered.
    pub fn execute_swap_for(
      who: &T::AccountId,
      order: &SwapOrderOf<T>,
    ) -> Result<Balance, DispatchError> {
      let route = Self::validate_order(order)?;
      let result = with_storage_layer(|| Self::settle_order(who, order, &route));
      if let Err(error) = &result {
        log::warn!(
          target: LOG_TARGET,
          "order of {} steps rolled back: {:?}",
          order.steps.len(),
          error,
        );
      }
      result
    }

    /// Structural and registry checks. Moves no funds.
    pub fn validate_order(
      order: &SwapOrderOf<T>,
    ) -> Result<Vec<RoutedStep<T::AccountId>>, DispatchError> {
      ensure!(!order.steps.is_empty(), Error::<T>::EmptyOrder);
      ensure!(
        order.steps.len() <= T::MaxSteps::get() as usize,
        Error::<T>::TooManySteps
      );
      ensure!(
        frame_system::Pallet::<T>::block_number() <= order.deadline,
        Error::<T>::Expired
      );
      for pair in order.steps.windows(2) {
        ensure!(
          pair[0].token_out == pair[1].token_in,
          Error::<T>::MalformedChain
        );
      }
      order.steps.iter().map(Self::route_step).collect()
    }

    fn route_step(step: &SwapStep) -> Result<RoutedStep<T::AccountId>, DispatchError> {
      ensure!(step.amount > 0, Error::<T>::ZeroAmount);
      if let SwapType::ExactOutput { max_amount_in } = step.swap_type {
        ensure!(max_amount_in > 0, Error::<T>::ZeroAmount);
      }
      ensure!(step.fee.is_valid(), Error::<T>::InvalidFeeTier);
      ensure!(step.token_in != step.token_out, Error::<T>::IdenticalAssets);
      let asset_in = Self::resolve_asset(step.token_in)?;
      let asset_out = Self::resolve_asset(step.token_out)?;
      // Native and its wrapped asset are the same thing to a venue
      ensure!(asset_in != asset_out, Error::<T>::IdenticalAssets);
      let venue = VenueRegistry::<T>::get(step.venue).ok_or(Error::<T>::UnknownVenue)?;
      Ok(RoutedStep {
        step: *step,
        venue,
        asset_in,
        asset_out,
      })
    }

    /// Asset a venue trades for `token`
    pub fn resolve_asset(token: AssetKind) -> Result<AssetKind, DispatchError> {
      match token {
        AssetKind::Native => Self::current_wrapped_native()
          .ok_or_else(|| Error::<T>::WrappedNativeNotConfigured.into()),
        asset => Ok(asset),
      }
    }

    /// Fund, step and pay out. Runs inside the order's storage layer.
    fn settle_order(
      who: &T::AccountId,
      order: &SwapOrderOf<T>,
      route: &[RoutedStep<T::AccountId>],
    ) -> Result<Balance, DispatchError> {
      let engine = Self::account_id();
      let (first, last) = match (route.first(), route.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::<T>::EmptyOrder.into()),
      };

      let opening = first.step.opening_amount();
      Self::pull_opening(who, &engine, first, opening)?;
      let mut state = ExecutionState::open(first.asset_in, opening);

      for leg in route {
        Self::execute_leg(&engine, leg, &mut state)?;
      }

      ensure!(
        state.current_amount >= order.min_amount_out,
        Error::<T>::SlippageExceeded
      );

      let amount_out = state.current_amount;
      Self::pay_out(
        &engine,
        who,
        last.step.token_out,
        state.current_token,
        amount_out,
      )?;
      for refund in &state.refunds {
        Self::pay_out(&engine, who, refund.token, refund.asset, refund.amount)?;
      }

      log::debug!(
        target: LOG_TARGET,
        "order settled after {} steps: {} of {:?}, {} refunds",
        state.step_index,
        amount_out,
        last.step.token_out,
        state.refunds.len(),
      );
      Self::deposit_event(Event::SwapExecuted {
        who: who.clone(),
        path: order.path(),
        amount_out,
      });
      Ok(amount_out)
    }

    /// Move the opening input from the caller into custody.
    fn pull_opening(
      who: &T::AccountId,
      engine: &T::AccountId,
      first: &RoutedStep<T::AccountId>,
      amount: Balance,
    ) -> DispatchResult {
      if first.step.token_in.is_native() {
        // A signed native transfer needs no allowance
        <T::Currency as NativeMutate<T::AccountId>>::transfer(
          who,
          engine,
          amount,
          Preservation::Preserve,
        )
        .map_err(|_| Error::<T>::InsufficientAllowanceOrBalance)?;
        T::NativeWrapper::wrap(engine, first.asset_in, amount)
          .map_err(|_| Error::<T>::NativeWrappingFailed)?;
      } else {
        let asset = Self::asset_id(first.asset_in)?;
        <T::Assets as ApprovalMutate<T::AccountId>>::transfer_from(asset, who, engine, engine, amount)
          .map_err(|_| Error::<T>::InsufficientAllowanceOrBalance)?;
      }
      Ok(())
    }

    /// Run one leg on its venue and verify the fill against custody balances.
    fn execute_leg(
      engine: &T::AccountId,
      leg: &RoutedStep<T::AccountId>,
      state: &mut ExecutionState,
    ) -> DispatchResult {
      let asset_in = Self::asset_id(leg.asset_in)?;
      let asset_out = Self::asset_id(leg.asset_out)?;
      let held = state.current_amount;

      let (spend_limit, request_amount, min_out) = match leg.step.swap_type {
        SwapType::ExactInput { min_amount_out } => (held, held, min_amount_out),
        SwapType::ExactOutput { max_amount_in } => {
          ensure!(max_amount_in <= held, Error::<T>::InputBudgetExceeded);
          (max_amount_in, leg.step.amount, leg.step.amount)
        }
      };

      // Approvals add up, so grant only the shortfall to the leg limit
      let standing =
        <T::Assets as ApprovalInspect<T::AccountId>>::allowance(asset_in, engine, &leg.venue);
      let top_up = spend_limit.saturating_sub(standing);
      if top_up > 0 {
        <T::Assets as ApprovalMutate<T::AccountId>>::approve(asset_in, engine, &leg.venue, top_up)
          .map_err(|_| Error::<T>::InsufficientAllowanceOrBalance)?;
      }

      let in_before = <T::Assets as FungiblesInspect<T::AccountId>>::balance(asset_in, engine);
      let out_before = <T::Assets as FungiblesInspect<T::AccountId>>::balance(asset_out, engine);

      let request = VenueRequest {
        payer: engine.clone(),
        recipient: engine.clone(),
        asset_in: leg.asset_in,
        asset_out: leg.asset_out,
        fee: leg.step.fee,
        swap_type: leg.step.swap_type,
        amount: request_amount,
      };
      let fill = T::Venues::swap(&leg.venue, request).map_err(|error| {
        log::debug!(
          target: LOG_TARGET,
          "venue {} failed step {}: {:?}",
          leg.step.venue,
          state.step_index,
          error,
        );
        Error::<T>::VenueExecutionFailed
      })?;

      let spent = in_before
        .saturating_sub(<T::Assets as FungiblesInspect<T::AccountId>>::balance(asset_in, engine));
      let received = <T::Assets as FungiblesInspect<T::AccountId>>::balance(asset_out, engine)
        .saturating_sub(out_before);

      ensure!(
        spent <= spend_limit && spent == fill.amount_in,
        Error::<T>::VenueExecutionFailed
      );
      ensure!(
        received == fill.amount_out && received >= min_out && received > 0,
        Error::<T>::VenueExecutionFailed
      );

      log::debug!(
        target: LOG_TARGET,
        "step {} on venue {}: {} of {:?} -> {} of {:?}",
        state.step_index,
        leg.step.venue,
        spent,
        leg.asset_in,
        received,
        leg.asset_out,
      );

      state.refund(leg.step.token_in, leg.asset_in, held.saturating_sub(spent));
      state.advance(leg.asset_out, received);
      Ok(())
    }

    /// Deliver `amount` of `asset` from custody to `who`, unwrapping when the caller
    /// named the native token.
    fn pay_out(
      engine: &T::AccountId,
      who: &T::AccountId,
      token: AssetKind,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      if amount == 0 {
        return Ok(());
      }
      if token.is_native() {
        T::NativeWrapper::unwrap(engine, asset, amount)
          .map_err(|_| Error::<T>::NativeWrappingFailed)?;
        <T::Currency as NativeMutate<T::AccountId>>::transfer(
          engine,
          who,
          amount,
          Preservation::Expendable,
        )
        .map_err(|_| Error::<T>::InsufficientAllowanceOrBalance)?;
      } else {
        <T::Assets as FungiblesMutate<T::AccountId>>::transfer(
          Self::asset_id(asset)?,
          engine,
          who,
          amount,
          Preservation::Expendable,
        )
        .map_err(|_| Error::<T>::InsufficientAllowanceOrBalance)?;
      }
      Ok(())
    }

    fn asset_id(asset: AssetKind) -> Result<u32, DispatchError> {
      asset
        .asset_id()
        .ok_or_else(|| Error::<T>::InvalidWrappedNative.into())
    }

    fn ensure_operator(origin: OriginFor<T>) -> Result<T::AccountId, DispatchError> {
      let who = ensure_signed(origin).map_err(|_| Error::<T>::Unauthorized)?;
      ensure!(
        Operator::<T>::get().as_ref() == Some(&who),
        Error::<T>::Unauthorized
      );
      Ok(who)
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  #[derive(DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub operator: Option<T::AccountId>,
    pub venues: Vec<(VenueId, T::AccountId)>,
    pub wrapped_natives: Vec<(NetworkId, AssetKind)>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(operator) = &self.operator {
        Operator::<T>::put(operator);
      }
      for (venue, adapter) in &self.venues {
        assert!(
          *venue < T::MaxVenues::get(),
          "Genesis venue id exceeds MaxVenues"
        );
        VenueRegistry::<T>::insert(venue, adapter);
      }
      for (network, token) in &self.wrapped_natives {
        assert!(!token.is_native(), "Native cannot be its own wrapped asset");
        WrappedNativeRegistry::<T>::insert(network, token);
      }
      // Custody account must survive holding nothing between orders
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }
}
