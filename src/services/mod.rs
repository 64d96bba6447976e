pub mod completion;
pub mod relay;
pub mod relay_client;
pub mod topics;
