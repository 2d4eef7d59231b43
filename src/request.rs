//! Reading the raw query of a request, from the url for GET and from the body for POST.
//!
//! Nothing in here reads the process environment implicitly. A `RequestSource` is handed in by
//! the caller, either a `CgiEnv` snapshot or an `http::Request`.

use std::io::{ErrorKind, Read};

use http::{header::CONTENT_LENGTH, Method, Request};
use log::{debug, trace, warn};

use crate::{
    error::Error,
    query::{self, QueryResult},
    settings::Settings,
};

/// Supplies the parts of a request needed to locate its query.
pub trait RequestSource {
    fn method(&self) -> &Method;

    /// The part of the url after `?`, if any.
    fn query_string(&self) -> Option<&str>;

    /// Declared length of the body. `Ok(None)` when no length was declared.
    fn content_length(&self) -> Result<Option<usize>, Error>;

    /// Fill `buf` completely from the body. Fails with `ErrorKind::UnexpectedEof` if the body is
    /// shorter than `buf`.
    fn read_body(&mut self, buf: &mut [u8]) -> std::io::Result<()>;
}

fn parse_content_length(value: &str) -> Result<Option<usize>, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidContentLength(value.to_string()))
}

/// A snapshot of the CGI request variables together with the body stream.
pub struct CgiEnv {
    method: Method,
    query_string: Option<String>,
    content_length: Option<String>,
    content_type: Option<String>,
    body: Box<dyn Read>,
}

impl CgiEnv {
    /// Build from `(name, value)` variables, ex. `("REQUEST_METHOD", "POST")`. Unknown variables
    /// are ignored. A missing `REQUEST_METHOD` is treated as GET.
    pub fn from_vars<I, K, V>(vars: I, body: impl Read + 'static) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = CgiEnv {
            method: Method::GET,
            query_string: None,
            content_length: None,
            content_type: None,
            body: Box::new(body),
        };

        for (key, value) in vars {
            match key.as_ref() {
                "REQUEST_METHOD" => {
                    let value = value.into();

                    env.method = match Method::from_bytes(value.as_bytes()) {
                        Ok(method) => method,
                        Err(_) => {
                            warn!("Invalid REQUEST_METHOD '{value}', falling back to GET");

                            Method::GET
                        }
                    };
                }
                "QUERY_STRING" => env.query_string = Some(value.into()),
                "CONTENT_LENGTH" => env.content_length = Some(value.into()),
                "CONTENT_TYPE" => env.content_type = Some(value.into()),
                _ => {}
            }
        }

        env
    }

    /// Snapshot the process environment and use stdin as the body. Variables that are not valid
    /// unicode are skipped.
    pub fn from_env() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

        Self::from_vars(vars, std::io::stdin())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl RequestSource for CgiEnv {
    fn method(&self) -> &Method {
        &self.method
    }

    fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    fn content_length(&self) -> Result<Option<usize>, Error> {
        match &self.content_length {
            Some(value) => parse_content_length(value),
            None => Ok(None),
        }
    }

    fn read_body(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.body.read_exact(buf)
    }
}

impl<B> RequestSource for Request<B>
where
    B: AsRef<[u8]>,
{
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn query_string(&self) -> Option<&str> {
        self.uri().query()
    }

    fn content_length(&self) -> Result<Option<usize>, Error> {
        let Some(value) = self.headers().get(CONTENT_LENGTH) else {
            return Ok(None);
        };

        let value = value.to_str().map_err(|_| {
            Error::InvalidContentLength(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })?;

        parse_content_length(value)
    }

    fn read_body(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        let body = self.body().as_ref();

        let Some(bytes) = body.get(..buf.len()) else {
            return Err(ErrorKind::UnexpectedEof.into());
        };

        buf.copy_from_slice(bytes);

        Ok(())
    }
}

/// Fetch the still encoded query. POST reads exactly the declared body length, every other
/// method uses the query string.
pub fn read_raw<S>(source: &mut S, settings: &Settings) -> Result<Vec<u8>, Error>
where
    S: RequestSource + ?Sized,
{
    if *source.method() == Method::POST {
        let len = source.content_length()?.unwrap_or(0);

        if len > settings.body_limit() {
            return Err(Error::BodyTooLarge {
                declared: len,
                limit: settings.body_limit(),
            });
        }

        let mut buf = vec![0; len];
        source.read_body(&mut buf)?;

        debug!("Read {len} byte POST body");

        return Ok(buf);
    }

    let query = source.query_string().unwrap_or_default();

    debug!("Using {} byte query string of {} request", query.len(), source.method());

    Ok(query.as_bytes().to_vec())
}

/// Read and parse the query of `source`.
pub fn read_query<S>(source: &mut S, settings: &Settings) -> Result<QueryResult, Error>
where
    S: RequestSource + ?Sized,
{
    let raw = read_raw(source, settings)?;

    let result = query::parse_with(&raw, settings)?;

    trace!("Parsed {} pairs", result.len());

    Ok(result)
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, ErrorKind};

    use http::Request;

    use super::{read_query, read_raw, CgiEnv, RequestSource};
    use crate::{error::Error, settings::Settings};

    fn env(vars: &[(&str, &str)], body: &str) -> CgiEnv {
        CgiEnv::from_vars(
            vars.iter().map(|(k, v)| (*k, v.to_string())),
            Cursor::new(body.as_bytes().to_vec()),
        )
    }

    #[test]
    fn test_get_uses_query_string() {
        let mut source = env(
            &[("REQUEST_METHOD", "GET"), ("QUERY_STRING", "a=1&b=%20")],
            "ignored=1",
        );

        let result = read_query(&mut source, &Settings::default()).unwrap();

        assert_eq!(result.get("a"), Some("1"));
        assert_eq!(result.get("b"), Some(" "));
        assert!(!result.contains_key("ignored"));
    }

    #[test]
    fn test_missing_method_and_query() {
        let mut source = env(&[], "");

        assert_eq!(source.method(), http::Method::GET);
        assert!(read_query(&mut source, &Settings::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_post_reads_declared_length() {
        let mut source = env(
            &[
                ("REQUEST_METHOD", "POST"),
                ("CONTENT_LENGTH", "7"),
                ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
                ("QUERY_STRING", "q=url"),
            ],
            "a=1;b=2trailing",
        );

        assert_eq!(
            source.content_type(),
            Some("application/x-www-form-urlencoded")
        );

        let result = read_query(&mut source, &Settings::default()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("b"), Some("2"));
        assert!(!result.contains_key("q"));
    }

    #[test]
    fn test_post_without_length() {
        let mut source = env(&[("REQUEST_METHOD", "POST")], "a=1");

        assert!(read_raw(&mut source, &Settings::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_content_length() {
        let mut source = env(
            &[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "ten")],
            "a=1",
        );

        assert!(matches!(
            read_raw(&mut source, &Settings::default()),
            Err(Error::InvalidContentLength(v)) if v == "ten"
        ));
    }

    #[test]
    fn test_body_too_large() {
        let mut source = env(
            &[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "3")],
            "a=1",
        );

        let settings = Settings::new().max_body_len(2);

        assert!(matches!(
            read_raw(&mut source, &settings),
            Err(Error::BodyTooLarge {
                declared: 3,
                limit: 2
            })
        ));
    }

    #[test]
    fn test_short_body() {
        let mut source = env(
            &[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "10")],
            "a=1",
        );

        let Err(Error::Io(e)) = read_raw(&mut source, &Settings::default()) else {
            panic!("expected io error");
        };

        assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_invalid_method_falls_back() {
        let source = env(&[("REQUEST_METHOD", "BAD METHOD")], "");

        assert_eq!(source.method(), http::Method::GET);
    }

    #[test]
    fn test_http_request_get() {
        let mut request = Request::builder()
            .method("GET")
            .uri("/search?q=rust%20lang&q=cgi")
            .body(Vec::new())
            .unwrap();

        let result = read_query(&mut request, &Settings::default()).unwrap();

        assert_eq!(result.get_all("q").collect::<Vec<_>>(), ["rust lang", "cgi"]);
    }

    #[test]
    fn test_http_request_post() {
        let mut request = Request::builder()
            .method("POST")
            .uri("/form")
            .header("Content-Length", "9")
            .body(b"name=a%2Bb".to_vec())
            .unwrap();

        let result = read_query(&mut request, &Settings::default()).unwrap();

        assert_eq!(result.get("name"), Some("a+"));

        let mut request = Request::builder()
            .method("POST")
            .header("Content-Length", "20")
            .body("short")
            .unwrap();

        assert!(matches!(
            read_query(&mut request, &Settings::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_invalid_body_encoding() {
        let mut source = env(
            &[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "5")],
            "a=%FE",
        );

        assert!(matches!(
            read_query(&mut source, &Settings::default()),
            Err(Error::Parse(_))
        ));
    }
}
