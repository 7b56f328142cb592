//! The supporting types of `SlackArr`: errors, the length abstraction,
//! the element capability traits and the slack policy.

mod element;
mod errors;
mod len_type;
mod policy;

pub use element::CloneFrom;
pub use element::Element;
pub use errors::*;
pub use len_type::LengthType;
pub use policy::DefaultSlack;
pub use policy::SlackPolicy;
pub(crate) use errors::fatal;
