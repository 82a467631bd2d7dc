pub mod legend;
pub mod popup;
pub mod proportional;
pub mod symbology;

pub use legend::*;
pub use popup::*;
pub use proportional::*;
pub use symbology::*;
