pub mod surface;
pub mod framebuffer;
pub mod palette;
pub mod projection;
pub mod road;

pub use surface::*;
pub use framebuffer::*;
pub use palette::*;
pub use projection::*;
pub use road::*;
