pub mod amount;
pub mod asset_pair;
pub mod price;
