pub mod download;
pub mod verify;

pub use download::download;
pub use verify::verify;
