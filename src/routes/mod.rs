/// Location update (upsert) and lookup routes.
pub mod driver_location;

/// Route that changes only a driver's status.
pub mod driver_status;

/// Health check route that returns a 200 OK status code if the server and its store are up.
pub mod health_check;

pub use driver_location::*;
pub use driver_status::*;
pub use health_check::*;
