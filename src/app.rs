//! Demo web application
//!
//! Routes used by the bundled front-end in `resources/static`.

use serde_json::json;

use crate::http::Request;
use crate::routing::HandlerResult;
use crate::server::HttpServer;

/// Static folder served by the demo
pub const STATIC_FOLDER: &str = "/static";

/// `/app/hello?name=X` -> `{"message":"Hello X"}`
pub fn hello(req: &Request) -> HandlerResult {
    Ok(json!({ "message": format!("Hello {}", req.value("name")) }).to_string())
}

/// `/app/pi` -> `{"pi":"3.141592653589793"}`
#[allow(clippy::unnecessary_wraps)]
pub fn pi(_req: &Request) -> HandlerResult {
    Ok(json!({ "pi": std::f64::consts::PI.to_string() }).to_string())
}

/// Register the demo routes and static folder
pub fn configure(server: &mut HttpServer) {
    server
        .staticfiles(STATIC_FOLDER)
        .get("/app/hello", hello)
        .get("/app/pi", pi);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_escapes_json() {
        let req = Request::get("/app/hello?name=Ana%20%22the%22%20Mar%C3%ADa").unwrap();
        let body = hello(&req).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["message"], "Hello Ana \"the\" María");
    }

    #[test]
    fn test_hello_without_name() {
        let req = Request::get("/app/hello").unwrap();
        assert_eq!(hello(&req).unwrap(), r#"{"message":"Hello "}"#);
    }

    #[test]
    fn test_pi() {
        let req = Request::get("/app/pi").unwrap();
        assert_eq!(pi(&req).unwrap(), r#"{"pi":"3.141592653589793"}"#);
    }
}
