//! Hotel records and their pictures.

pub mod handlers;
pub mod upload;

pub use upload::{read_hotel_form, HotelForm};
