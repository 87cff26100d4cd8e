pub mod credential;
pub mod error;
pub mod object;
pub mod request;
pub mod response;
pub mod session;
pub mod util;
