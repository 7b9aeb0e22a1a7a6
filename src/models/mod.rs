pub mod automation;
pub mod calendar;
pub mod device;
pub mod plant;
pub mod sensor;
pub mod stage;

pub use automation::*;
pub use calendar::*;
pub use device::*;
pub use plant::*;
pub use sensor::*;
pub use stage::*;
