// Adapters layer: concrete transports behind the domain ports.

pub mod mailer;

pub use mailer::{HttpMailer, Mailer, SimulatedMailer};
