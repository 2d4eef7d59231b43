//! A CGI program echoing the pairs of its query back as plain text.
//!
//! Point a CGI capable server at the binary, or try it from a shell:
//! `QUERY_STRING='a=1&a=2;b=%41' cargo run --example echo`

use std::io::Write;

use cgi_query::{
    http_utils::{write_cgi_response, write_content_type, IntoResponse},
    read_query, CgiEnv, Settings,
};

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut env = CgiEnv::from_env();
    let settings = Settings::new().plus_as_space(true);

    let mut stdout = std::io::stdout().lock();

    let query = match read_query(&mut env, &settings) {
        Ok(query) => query,
        Err(e) => {
            log::error!("{e}");

            return write_cgi_response(&mut stdout, &e.response());
        }
    };

    write_content_type(&mut stdout, "text/plain; charset=utf-8")?;

    for pair in &query {
        writeln!(stdout, "{:?} = {:?}", pair.key, pair.value)?;
    }

    Ok(())
}
