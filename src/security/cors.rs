//! CORS policy construction.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from the configured origin list.
///
/// A `*` entry allows any origin; otherwise only the listed origins are
/// accepted. Preflight requests are answered by this layer with 200 and no
/// body.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin
                    .parse()
                    .map_err(|_| tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin"))
                    .ok()
            })
            .collect();
        layer.allow_origin(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_and_explicit_origins_build() {
        cors_layer(&CorsConfig {
            allowed_origins: vec!["*".to_string()],
        });

        cors_layer(&CorsConfig {
            allowed_origins: vec![
                "https://app.example.com".to_string(),
                "not a header value \u{7f}".to_string(),
            ],
        });
    }
}
