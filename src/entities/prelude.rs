pub use super::landreg_price::Entity as LandregPrice;
