//! Reading and writing the per-signature grid state cookie.
//!
//! The jar percent-encodes values on `Set-Cookie` and decodes them on the
//! way back in, so [`StateCodec`] only ever sees `<hex>.<json>`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use roster_core::grid::{GridState, StateCodec, StorageSignature};
use time::Duration;

/// Load the state stored for `signature`.
///
/// A missing, tampered, or unparsable cookie yields the default state.
pub fn load(jar: &CookieJar, codec: &StateCodec, signature: &StorageSignature) -> GridState {
    jar.get(signature.as_str())
        .and_then(|cookie| {
            let state = codec.open(cookie.value());
            if state.is_none() {
                tracing::warn!(signature = %signature, "Ignoring invalid grid state cookie");
            }
            state
        })
        .unwrap_or_default()
}

/// Persist `state` under `signature` for `max_age_secs` seconds.
pub fn save(
    jar: CookieJar,
    codec: &StateCodec,
    signature: &StorageSignature,
    state: &GridState,
    max_age_secs: i64,
) -> CookieJar {
    let cookie = Cookie::build((signature.to_string(), codec.seal(state)))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}
