mod check;
mod convert;

pub use check::check;
pub use convert::convert;
