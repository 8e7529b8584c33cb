pub mod builders;
pub mod coercion;
pub mod resolver;
pub mod services;
