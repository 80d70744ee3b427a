pub mod alphavantage;
pub mod stooq;
pub mod util;
