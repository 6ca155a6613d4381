//! Wire-format codecs for Oracle data types
//!
//! Each submodule converts between one family of host values and its wire
//! representation. Dispatch across families by declared type lives in
//! [`crate::codec`].

mod binary;
mod interval;
mod lob;
mod number;
mod rowid;
mod temporal;
mod text;

pub use binary::{
    decode_binary_double, decode_binary_float, encode_binary_double, encode_binary_float,
};
pub use interval::{
    decode_day_to_second, decode_year_to_month, encode_day_to_second, encode_year_to_month,
    to_signed_count, IntervalUnit,
};
pub use lob::{LobKind, LobLocator};
pub use number::{
    decode_number, encode_f64, encode_i64, encode_number, encode_unconstrained, OracleNumber,
};
pub use rowid::{decode_rowid, RowId, ROWID_LENGTH};
pub use temporal::{decode_timestamp, encode_date, encode_timestamp, Timestamp};
pub use text::{decode_raw, decode_text, encode_bytes, encode_text};
