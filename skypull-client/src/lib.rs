pub mod api;
pub mod error;
pub mod model;
pub mod paginate;
pub mod session;
pub mod uri;

pub use error::ClientError;
pub use model::Profile;
pub use paginate::{Page, Paginator};
pub use session::Session;
pub use uri::AtUri;
