#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use labeldist_grid as grid;

#[doc(inline)]
pub use labeldist_transform as transform;
