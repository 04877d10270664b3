mod election;
mod root;

pub use election::ElectionId;
pub use root::Root;
