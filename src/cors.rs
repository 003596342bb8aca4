use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Method, Status},
    Request, Response, Route,
};

const ALLOWED_METHODS: &str = "GET, HEAD, PUT, PATCH, POST, DELETE";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

pub fn routes() -> Vec<Route> {
    routes![preflight]
}

/// Answer a preflight for any path. The CORS headers are added by
/// [`CorsFairing`].
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}

/// Lets browsers on any origin call the API.
#[derive(Debug, Copy, Clone)]
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        if req.method() == Method::Options {
            res.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
            res.set_header(Header::new("Access-Control-Allow-Headers", ALLOWED_HEADERS));
        }
    }
}
