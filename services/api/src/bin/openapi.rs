//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 document for the academy API to disk.
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let doc = ApiDoc::openapi();
    let route_count = doc.paths.paths.len();
    std::fs::write(&path, doc.to_pretty_json()?)?;
    println!("Wrote {} ({} paths)", path, route_count);
    Ok(())
}
