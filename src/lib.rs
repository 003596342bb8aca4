#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, RegistryFairing};
use crate::cors::CorsFairing;
use crate::logging::LoggerFairing;
use crate::model::session::SessionStore;

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;

/// Assemble the server from Rocket's default configuration sources.
pub fn build() -> Rocket<Build> {
    assemble(rocket::build())
}

/// Attach state, routes and catchers to a bare Rocket instance.
fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(ConfigFairing)
        .attach(RegistryFairing)
        .attach(LoggerFairing)
        .attach(CorsFairing)
        .manage(SessionStore::default())
        .mount("/", api::routes())
        .mount("/", cors::routes())
        .register("/", api::catchers())
}

/// Configuration for a server backed by the given data file, with the static
/// page expected beside it (same name, `.html` extension).
#[cfg(test)]
pub(crate) fn test_figment(data_file: &std::path::Path) -> rocket::figment::Figment {
    log4rs_test_utils::test_logging::init_logging_once_for(["ourvoice_backend"], None, None);

    rocket::Config::figment()
        .merge(("data_file", data_file))
        .merge(("index_file", data_file.with_extension("html")))
        .merge(("log_level", "off"))
}

#[cfg(test)]
pub(crate) fn rocket_for_data_file(data_file: &std::path::Path) -> Rocket<Build> {
    assemble(rocket::custom(test_figment(data_file)))
}
