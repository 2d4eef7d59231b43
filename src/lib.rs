//! Decoding and parsing of the query data of a CGI request.
//!
//! A query arrives percent-encoded, either in the url (`QUERY_STRING`) for GET or in the body for
//! POST. [`parse`] decodes it and splits it into ordered [`Pair`]s, keeping duplicates:
//!
//! ```
//! let query = cgi_query::parse("name=alice&name=bob;lang=%F0%9F%A6%80").unwrap();
//!
//! assert_eq!(query.get_all("name").collect::<Vec<_>>(), ["alice", "bob"]);
//! assert_eq!(query.get("lang"), Some("🦀"));
//! ```
//!
//! [`request::read_query`] picks the right source for a request given a [`RequestSource`], such
//! as a [`CgiEnv`] snapshot of the process environment or an `http::Request`.

pub mod error;
pub mod http_utils;
pub mod query;
pub mod request;
pub mod settings;
pub mod url_decoding;

pub use error::{Error, ParseError};
pub use query::{parse, parse_bytes, parse_with, Pair, QueryResult};
pub use request::{read_query, CgiEnv, RequestSource};
pub use settings::Settings;
pub use url_decoding::{decode, decode_bytes, decode_with};

pub use http;
