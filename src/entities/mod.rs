//! Sea-ORM entities backing the catalog.

pub mod category;
pub mod inquiry;
pub mod vehicle;
pub mod vehicle_image;

pub use inquiry::InquiryStatus;
pub use vehicle::{BodyType, FeatureList, FuelType, Transmission, VehicleStatus};
