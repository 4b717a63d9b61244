pub mod error;
pub mod request;
pub mod traits;

pub mod prelude {
    pub use super::error::*;
    pub use super::request::*;
    pub use super::traits::*;
}
