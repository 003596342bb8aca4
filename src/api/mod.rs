use rocket::{Catcher, Route};

mod admin;
mod auth;
mod catchers;
mod public;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes.extend(auth::routes());
    routes.extend(admin::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers::catchers()
}
