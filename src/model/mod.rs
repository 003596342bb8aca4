use rand::Rng;

pub mod auth;
pub mod credentials;
pub mod envelope;
pub mod persistence;
pub mod polling;
pub mod registry;
pub mod session;
pub mod stats;
pub mod timestamp;
pub mod voter;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `len` random lowercase base-36 characters.
pub(crate) fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}
