pub mod labels;
pub mod mock;
pub mod transport;
pub mod uuid;

pub use labels::{CharacteristicLabel, ServiceLabel};
pub use mock::MockTransport;
pub use transport::{Frame, Transport};
pub use uuid::BleUuid;
