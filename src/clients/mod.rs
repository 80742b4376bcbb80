pub mod monday_client;

pub use monday_client::{GraphQlTransport, MondayClient};
