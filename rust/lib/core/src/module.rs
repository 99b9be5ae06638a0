use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary collects every module and merges its routes into a
/// single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, already bound to their state.
    fn routes(&self) -> Router;
}
