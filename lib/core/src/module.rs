use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (devices, customers, ...) implements this trait
/// to register its API endpoints. The binary entry point collects all
/// modules and nests their routes under `/api/{name}`.
pub trait Module: Send + Sync {
    /// Module name, used for logging and route prefixes.
    fn name(&self) -> &str;

    /// Return the module's routes, to be nested under `/api/{name}`.
    fn routes(&self) -> Router;
}
