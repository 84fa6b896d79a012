#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn execute_swap(n: u32) -> Weight;
	fn set_venue() -> Weight;
	fn set_wrapped_native() -> Weight;
	fn set_operator() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// The range of component `n` is `[1, 4]`.
	fn execute_swap(n: u32) -> Weight {
		Weight::from_parts(60_000_000, 6000)
			.saturating_add(Weight::from_parts(45_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().reads((5_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(3))
			.saturating_add(T::DbWeight::get().writes((6_u64).saturating_mul(n.into())))
	}
	fn set_venue() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_wrapped_native() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_operator() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn execute_swap(n: u32) -> Weight {
		Weight::from_parts(60_000_000, 6000)
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(Weight::from_parts(45_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads_writes((5_u64).saturating_mul(n.into()), (6_u64).saturating_mul(n.into())))
	}
	fn set_venue() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn set_wrapped_native() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn set_operator() -> Weight {
		Weight::from_parts(12_000_000, 1500)
	}
}
