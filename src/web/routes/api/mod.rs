pub mod subscribe;

pub use subscribe::{subscribe, subscribe_with_group};
