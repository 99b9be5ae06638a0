mod follow;
mod like;
mod post;
mod profile;
mod ranking;
mod upload;

pub use follow::*;
pub use like::*;
pub use post::*;
pub use profile::*;
pub use ranking::*;
pub use upload::*;
