pub mod geocoding;
pub mod images;
pub mod openai;

pub use geocoding::*;
pub use images::*;
pub use openai::*;
