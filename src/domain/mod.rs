mod actuator;
mod aviary;
mod batch;
mod device;
mod person;
mod reading;
mod resource;
mod sensor;
pub mod status;

pub use actuator::{Actuator, ActuatorPayload};
pub use aviary::{Aviary, AviaryPayload};
pub use batch::{Batch, BatchPayload};
pub use device::{Device, DevicePayload};
pub use person::{Person, PersonPayload};
pub use reading::{AviaryStatus, Reading, ReadingValue};
pub use resource::{Backend, Editable, Resource, Schema};
pub use sensor::{Sensor, SensorPayload};
pub use status::{ActiveStatus, PowerStatus};
