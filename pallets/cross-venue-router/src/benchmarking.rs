extern crate alloc;

use crate::{types::BenchmarkHelper, *};
use alloc::vec::Vec;
use frame::deps::frame_support::traits::{EnsureOrigin, Get, fungibles::approvals::Mutate};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;

const FIRST_ASSET: u32 = 1_000;
const OPENING_AMOUNT: Balance = 1_000_000_000_000;
const LEG_OUTPUT: Balance = 1_000_000_000;

#[benchmarks]
mod benches {
  use super::*;

  /// Order of `n` exact-input legs, each on its own venue.
  #[benchmark]
  fn execute_swap(n: Linear<1, { T::MaxSteps::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let assets: Vec<AssetKind> = (0..=n).map(|i| AssetKind::Local(FIRST_ASSET + i)).collect();
    for asset in &assets {
      T::BenchmarkHelper::create_asset(*asset).expect("Failed to create asset");
    }
    T::BenchmarkHelper::mint_asset(assets[0], &caller, OPENING_AMOUNT.saturating_mul(2))
      .expect("Failed to fund caller");

    let mut steps = Vec::new();
    for (i, pair) in assets.windows(2).enumerate() {
      let venue = T::BenchmarkHelper::deploy_venue(i as u32, pair[1], LEG_OUTPUT);
      VenueRegistry::<T>::insert(i as VenueId, venue);
      steps.push(SwapStep {
        token_in: pair[0],
        token_out: pair[1],
        fee: FeeTier::MEDIUM,
        venue: i as VenueId,
        amount: OPENING_AMOUNT,
        swap_type: SwapType::ExactInput { min_amount_out: 0 },
      });
    }

    <T::Assets as Mutate<T::AccountId>>::approve(
      FIRST_ASSET,
      &caller,
      &Pallet::<T>::account_id(),
      OPENING_AMOUNT,
    )
    .expect("Failed to approve router");

    let order = SwapOrder {
      steps,
      deadline: u32::MAX.into(),
      min_amount_out: 1,
    };

    #[extrinsic_call]
    execute_swap(RawOrigin::Signed(caller), order);
  }

  #[benchmark]
  fn set_venue() {
    let operator: T::AccountId = whitelisted_caller();
    Operator::<T>::put(&operator);
    let adapter: T::AccountId = account("venue", 0, 0);
    let venue = T::MaxVenues::get().saturating_sub(1);

    #[extrinsic_call]
    set_venue(RawOrigin::Signed(operator), venue, Some(adapter.clone()));

    assert_eq!(VenueRegistry::<T>::get(venue), Some(adapter));
  }

  #[benchmark]
  fn set_wrapped_native() {
    let operator: T::AccountId = whitelisted_caller();
    Operator::<T>::put(&operator);
    let token = AssetKind::Local(FIRST_ASSET);

    #[extrinsic_call]
    set_wrapped_native(RawOrigin::Signed(operator), 1, Some(token));

    assert_eq!(WrappedNativeRegistry::<T>::get(1), Some(token));
  }

  #[benchmark]
  fn set_operator() -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let new_operator: T::AccountId = account("operator", 0, 0);

    #[extrinsic_call]
    set_operator(origin as T::RuntimeOrigin, new_operator.clone());

    assert_eq!(Operator::<T>::get(), Some(new_operator));
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
