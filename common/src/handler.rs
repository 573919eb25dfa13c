//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of some `Args`.
///
/// Commands, queries, database operations and geocoder lookups are all
/// expressed as [`Handler`]s over their own operation types.
pub trait Handler<Args = ()> {
    /// Type of a successful [`Handler`] outcome.
    type Ok;

    /// Type of a [`Handler`] failure.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
