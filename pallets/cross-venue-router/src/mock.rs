use crate as pallet_cross_venue_router;

use polkadot_sdk::frame_support::traits::fungible::Mutate as FungibleMutate;
use polkadot_sdk::frame_support::traits::fungibles::{
  Inspect as FungiblesInspect, Mutate as FungiblesMutate,
  approvals::{Inspect as ApprovalInspect, Mutate as ApprovalMutate},
};
use polkadot_sdk::frame_support::traits::tokens::{Fortitude, Precision, Preservation};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU128},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};

use crate::types::{AssetKind, SwapType, VenueFill, VenueRequest};
use primitives::AssetInspector;
use primitives::ecosystem::{network_ids, pallet_ids, params};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const PRECISION: u128 = params::PRECISION;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const OPERATOR: u64 = 100;

// Venue adapter accounts registered at genesis as venues 0, 1 and 2
pub const UNISWAP: u64 = 10;
pub const PANCAKE: u64 = 11;
pub const SUSHI: u64 = 12;
/// Deployed but not registered
pub const CURVE: u64 = 13;

/// Holds the native backing of the wrapped-native asset
pub const WRAPPED_RESERVE: u64 = 999;

pub const TOKEN_A: u32 = 1;
pub const TOKEN_B: u32 = 2;
pub const TOKEN_C: u32 = 3;
pub const WETH: u32 = 4;

pub const INITIAL_BALANCE: u128 = 10_000 * PRECISION;

/// Behaviour of a deployed mock venue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockVenue {
  /// Exact-input venue paying a fixed amount whatever it receives
  Fixed { amount_out: u128 },
  /// Exact-output venue charging a fixed input for the requested output
  FixedCost { amount_in: u128 },
  /// Rejects every swap
  Failing,
  /// Takes the input, delivers `delivered` but reports `reported`
  ShortDelivery { reported: u128, delivered: u128 },
  /// Pulls `amount_in` and pays `amount_out` for any request, reporting both truthfully
  PartialFill { amount_in: u128, amount_out: u128 },
}

// State containers for stateful mocks
thread_local! {
    pub static VENUES: RefCell<BTreeMap<u64, MockVenue>> = const { RefCell::new(BTreeMap::new()) };

    // Fee tier seen by each venue on its last call
    pub static LAST_FEE: RefCell<BTreeMap<u64, u32>> = const { RefCell::new(BTreeMap::new()) };
}

pub fn set_venue_behaviour(venue: u64, behaviour: MockVenue) {
  VENUES.with(|v| v.borrow_mut().insert(venue, behaviour));
}

/// Mirrors `setMockReturn` of a fixed-output router
pub fn set_mock_return(venue: u64, amount_out: u128) {
  set_venue_behaviour(venue, MockVenue::Fixed { amount_out });
}

pub fn last_fee_seen(venue: u64) -> Option<u32> {
  LAST_FEE.with(|f| f.borrow().get(&venue).copied())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    CrossVenueRouter: pallet_cross_venue_router,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  // The custody account holds no native to reserve approval deposits from
  type ApprovalDeposit = ConstU128<0>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

parameter_types! {
  pub const RouterPalletId: PalletId = PalletId(*pallet_ids::CROSS_VENUE_ROUTER_PALLET_ID);
  pub const LocalNetwork: u64 = network_ids::LOCAL_DEV;
  pub const MaxSwapSteps: u32 = params::MAX_SWAP_STEPS;
  pub const MaxVenues: u8 = params::MAX_VENUES;
}

// MOCK IMPLEMENTATIONS

fn asset_id(asset: AssetKind) -> Result<u32, DispatchError> {
  asset
    .asset_id()
    .ok_or(DispatchError::Other("Venue cannot trade native"))
}

/// Venue dispatcher: looks up the behaviour deployed at the venue account and moves
/// funds through pallet-assets so rollback covers venue transfers too.
pub struct MockVenues;
impl pallet_cross_venue_router::VenueAdapter<u64, u128> for MockVenues {
  fn swap(
    venue: &u64,
    request: VenueRequest<u64, u128>,
  ) -> Result<VenueFill<u128>, DispatchError> {
    let behaviour = VENUES
      .with(|v| v.borrow().get(venue).copied())
      .ok_or(DispatchError::Other("No venue deployed"))?;
    LAST_FEE.with(|f| f.borrow_mut().insert(*venue, request.fee.0));
    let asset_in = asset_id(request.asset_in)?;
    let asset_out = asset_id(request.asset_out)?;

    let (amount_in, delivered, reported) = match (behaviour, request.swap_type) {
      (MockVenue::Failing, _) => return Err(DispatchError::Other("Venue rejected swap")),
      (MockVenue::Fixed { amount_out }, SwapType::ExactInput { min_amount_out }) => {
        if amount_out < min_amount_out {
          return Err(DispatchError::Other("Insufficient output"));
        }
        (request.amount, amount_out, amount_out)
      }
      (MockVenue::FixedCost { amount_in }, SwapType::ExactOutput { max_amount_in }) => {
        if amount_in > max_amount_in {
          return Err(DispatchError::Other("Excessive input"));
        }
        (amount_in, request.amount, request.amount)
      }
      (
        MockVenue::ShortDelivery {
          reported,
          delivered,
        },
        SwapType::ExactInput { .. },
      ) => (request.amount, delivered, reported),
      (
        MockVenue::PartialFill {
          amount_in,
          amount_out,
        },
        _,
      ) => (amount_in, amount_out, amount_out),
      _ => return Err(DispatchError::Other("Unsupported swap type")),
    };

    <Assets as ApprovalMutate<u64>>::transfer_from(
      asset_in,
      &request.payer,
      venue,
      venue,
      amount_in,
    )?;
    <Assets as FungiblesMutate<u64>>::transfer(
      asset_out,
      venue,
      &request.recipient,
      delivered,
      Preservation::Expendable,
    )?;
    Ok(VenueFill {
      amount_in,
      amount_out: reported,
    })
  }
}

/// WETH-style wrapper: native is parked in `WRAPPED_RESERVE` while the wrapped asset
/// circulates.
pub struct MockNativeWrapper;
impl pallet_cross_venue_router::NativeWrapper<u64, u128> for MockNativeWrapper {
  fn wrap(who: &u64, wrapped: AssetKind, amount: u128) -> DispatchResult {
    let id = asset_id(wrapped)?;
    <Balances as FungibleMutate<u64>>::transfer(
      who,
      &WRAPPED_RESERVE,
      amount,
      Preservation::Expendable,
    )?;
    <Assets as FungiblesMutate<u64>>::mint_into(id, who, amount)?;
    Ok(())
  }

  fn unwrap(who: &u64, wrapped: AssetKind, amount: u128) -> DispatchResult {
    let id = asset_id(wrapped)?;
    <Assets as FungiblesMutate<u64>>::burn_from(
      id,
      who,
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Polite,
    )?;
    <Balances as FungibleMutate<u64>>::transfer(
      &WRAPPED_RESERVE,
      who,
      amount,
      Preservation::Preserve,
    )?;
    Ok(())
  }
}

impl pallet_cross_venue_router::Config for Test {
  type Currency = Balances;
  type Assets = Assets;
  type Venues = MockVenues;
  type NativeWrapper = MockNativeWrapper;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type PalletId = RouterPalletId;
  type NetworkId = LocalNetwork;
  type MaxSteps = MaxSwapSteps;
  type MaxVenues = MaxVenues;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = RouterBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct RouterBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::types::BenchmarkHelper<u64> for RouterBenchmarkHelper {
  fn create_asset(asset: AssetKind) -> DispatchResult {
    let id = asset_id(asset)?;
    if !<Assets as FungiblesInspect<u64>>::asset_exists(id) {
      Assets::force_create(RuntimeOrigin::root(), id, OPERATOR, true, 1)?;
    }
    Ok(())
  }

  fn mint_asset(asset: AssetKind, to: &u64, amount: u128) -> DispatchResult {
    match asset {
      AssetKind::Native => {
        <Balances as FungibleMutate<u64>>::mint_into(to, amount)?;
      }
      AssetKind::Local(id) | AssetKind::Foreign(id) => {
        <Assets as FungiblesMutate<u64>>::mint_into(id, to, amount)?;
      }
    }
    Ok(())
  }

  fn deploy_venue(index: u32, asset_out: AssetKind, amount_out: u128) -> u64 {
    let venue = 500 + u64::from(index);
    set_mock_return(venue, amount_out);
    Self::mint_asset(asset_out, &venue, amount_out.saturating_mul(2))
      .expect("Failed to fund venue");
    venue
  }
}

/// Engine custody account
pub fn router_account() -> u64 {
  CrossVenueRouter::account_id()
}

pub fn asset_balance(asset: u32, who: u64) -> u128 {
  <Assets as FungiblesInspect<u64>>::balance(asset, &who)
}

/// Standing allowance the router has granted `venue` over `asset`
pub fn router_allowance(asset: u32, venue: u64) -> u128 {
  <Assets as ApprovalInspect<u64>>::allowance(asset, &router_account(), &venue)
}

pub fn native_balance(who: u64) -> u128 {
  Balances::free_balance(who)
}

/// Let the router pull `amount` of `asset` from `owner`
pub fn approve_router(owner: u64, asset: u32, amount: u128) {
  Assets::approve_transfer(RuntimeOrigin::signed(owner), asset, router_account(), amount)
    .expect("approval succeeds");
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut storage = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let venues = [UNISWAP, PANCAKE, SUSHI, CURVE];
  let native_holders = [ALICE, BOB, OPERATOR, WRAPPED_RESERVE]
    .into_iter()
    .chain(venues);
  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: native_holders.map(|who| (who, INITIAL_BALANCE)).collect(),
    ..Default::default()
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  // Every asset is sufficient so venues and the router need no native to hold them
  let assets = [TOKEN_A, TOKEN_B, TOKEN_C, WETH];
  let mut accounts = Vec::new();
  for asset in assets {
    accounts.push((asset, ALICE, INITIAL_BALANCE));
    accounts.push((asset, BOB, INITIAL_BALANCE));
    for venue in venues {
      accounts.push((asset, venue, INITIAL_BALANCE));
    }
  }
  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: assets.iter().map(|id| (*id, OPERATOR, true, 1)).collect(),
    accounts,
    ..Default::default()
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  // Mirrors the deployment setup: three venues and the local wrapped-native token
  pallet_cross_venue_router::GenesisConfig::<Test> {
    operator: Some(OPERATOR),
    venues: vec![(0, UNISWAP), (1, PANCAKE), (2, SUSHI)],
    wrapped_natives: vec![(network_ids::LOCAL_DEV, AssetKind::Local(WETH))],
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  // Reset thread locals
  VENUES.with(|v| v.borrow_mut().clear());
  LAST_FEE.with(|f| f.borrow_mut().clear());

  let mut ext: polkadot_sdk::sp_io::TestExternalities = storage.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
