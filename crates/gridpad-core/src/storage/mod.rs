//! Storage module for CSV import/export

pub mod csv;

pub use csv::{
    CsvOptions, DEFAULT_EXPORT_NAME, decode, decode_with_header, encode, encode_with_header,
    read_csv, write_csv,
};
