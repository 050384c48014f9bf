pub mod catalog;
pub mod tgju;
pub mod tsetmc;

pub use catalog::{find_currency, find_index, find_industry, Currency, CURRENCIES};
pub use tgju::TgjuAdapter;
pub use tsetmc::TsetmcAdapter;
