pub mod car;

pub use car::{Car, CarRow, Tags};
