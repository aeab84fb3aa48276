pub mod decode;
pub mod errors;
pub mod filter;
pub mod head;
pub mod outliers;
mod quotes;
pub mod sample;
pub mod settings;
pub mod stream;
pub mod summary;
pub mod table;
