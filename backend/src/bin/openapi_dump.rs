//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use utoipa::OpenApi;
use voice_orders::doc::ApiDoc;

fn main() -> io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")
}
